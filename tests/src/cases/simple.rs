use crate::support::*;

pub fn test() {
    plain_expect(
        ToReceive {
            count: 1,
            when_sending: lines![
                ..lines!({
                    "name": "test_query",
                    "hostIdentifier": "mac-001"
                })
            ],
        },
        |received| {
            assert_eq!("results", received[0]["category"]);
            assert_eq!("default", received[0]["severity"]);
            assert_eq!(
                r#"{"hostIdentifier":"mac-001","name":"test_query"}"#,
                received[0]["message"]
            );
            assert!(received[0].get("pairs").is_none());
        },
    );
}
