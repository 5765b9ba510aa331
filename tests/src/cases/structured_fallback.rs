use crate::support::*;

pub fn test() {
    // None of these carry fields, so each is only written once
    structured_expect(
        ToReceive {
            count: 4,
            when_sending: lines![
                ..line("not valid json"),
                ..lines!({ "string": "{}" }),
                ..lines!({ "string": "[1,2,3]" }),
                ..lines!({ "string": r#"{"name":""}"# })
            ],
        },
        |received| {
            let messages: Vec<_> = received
                .iter()
                .map(|received| received["message"].as_str())
                .collect();

            assert_eq!(
                vec![
                    Some("not valid json"),
                    Some("{}"),
                    Some("[1,2,3]"),
                    Some(r#"{"name":""}"#)
                ],
                messages
            );

            for received in received {
                assert!(received.get("pairs").is_none());
            }
        },
    );
}
