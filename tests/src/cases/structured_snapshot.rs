use crate::support::*;

pub fn test() {
    let snapshot = json!({
        "snapshot": [{ "hostname": "mac-001" }],
        "action": "snapshot",
        "name": "system_info",
        "hostIdentifier": "mac-001",
        "epoch": 0
    })
    .to_string();

    structured_expect(
        ToReceive {
            count: 2,
            when_sending: lines![..lines!({ "snapshot": snapshot })],
        },
        |received| {
            assert_eq!("snapshots", received[0]["category"]);
            assert_eq!(
                json!([
                    ["name", "system_info"],
                    ["hostIdentifier", "mac-001"],
                    ["action", "snapshot"],
                    ["epoch", "0"]
                ]),
                received[0]["pairs"]
            );

            assert_eq!("snapshots", received[1]["category"]);
            assert_eq!(snapshot, received[1]["message"]);
        },
    );
}
