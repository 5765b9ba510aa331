use crate::support::*;

pub fn test() {
    let long = "a".repeat(256);

    let received = server::builder()
        .max_line_bytes(64)
        .build(server::input(lines![
            ..line("before"),
            ..lines!({ "string": long }),
            ..line("after")
        ]))
        .finish();

    assert_eq!(2, received.len(), "unexpected events: {:#?}", received);

    assert_eq!("before", received[0]["message"]);
    assert_eq!("after", received[1]["message"]);
}
