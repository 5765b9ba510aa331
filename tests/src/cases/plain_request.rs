use crate::support::*;

pub fn test() {
    let result = r#"{"name":"q","unixTime":1731437400}"#;

    plain_expect(
        ToReceive {
            count: 2,
            when_sending: lines![
                ..lines!({ "string": result }),
                ..lines!({ "log": result })
            ],
        },
        |received| {
            for received in received {
                assert_eq!("results", received["category"]);
                assert_eq!(result, received["message"]);
            }
        },
    );
}
