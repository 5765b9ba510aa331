use crate::support::*;

pub fn test() {
    structured_expect(
        ToReceive {
            count: 2,
            when_sending: lines![
                ..lines!({
                    "action": "added",
                    "columns": {
                        "hostname": "test-mac",
                        "cpu_type": "arm64"
                    },
                    "counter": 0,
                    "numerics": false,
                    "epoch": 0,
                    "unixTime": 1731437400,
                    "decorations": {
                        "host_uuid": "4740D59F-699E-5B29-960B-979AAF9BBEEB"
                    },
                    "calendarTime": "Tue Nov 12 17:30:00 2024 UTC",
                    "hostIdentifier": "test-mac",
                    "name": "pack_system_info"
                })
            ],
        },
        |received| {
            assert_eq!(
                json!([
                    ["name", "pack_system_info"],
                    ["hostIdentifier", "test-mac"],
                    ["calendarTime", "Tue Nov 12 17:30:00 2024 UTC"],
                    ["unixTime", "1731437400"],
                    ["action", "added"],
                    ["columns", r#"{"cpu_type":"arm64","hostname":"test-mac"}"#],
                    ["decorations", r#"{"host_uuid":"4740D59F-699E-5B29-960B-979AAF9BBEEB"}"#],
                    ["epoch", "0"]
                ]),
                received[0]["pairs"]
            );

            assert!(received[1].get("pairs").is_none());
        },
    );
}
