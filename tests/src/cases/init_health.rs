use crate::support::*;

pub fn test() {
    plain_expect(
        ToReceive {
            count: 1,
            when_sending: lines![
                ..lines!({ "init": "unifiedlog" }),
                ..lines!({ "health": "" }),
                ..line("after")
            ],
        },
        |received| {
            assert_eq!("after", received[0]["message"]);
        },
    );
}
