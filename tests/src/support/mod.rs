pub mod server;

pub use serde_json::Value;

macro_rules! lines {
    ($(..$lines:expr),+) => {{
        let mut v = Vec::new();

        $(
            v.extend($lines);
        )+

        v
    }};
    ({$($json:tt)*}) => {{
        let v = serde_json::to_vec(&json!({$($json)*})).unwrap();
        vec![v]
    }};
}

pub(crate) fn line(s: impl AsRef<str>) -> Vec<Vec<u8>> {
    vec![s.as_ref().as_bytes().to_vec()]
}

pub(crate) fn test_child(name: &str) -> bool {
    use std::{
        env,
        process::{
            Command,
            Stdio,
        },
    };

    let self_bin = env::args().next().expect("missing self command");

    let mut test = Command::new(self_bin)
        .arg(name)
        .stdout(Stdio::inherit())
        .spawn()
        .expect("failed to start child process");

    test.wait().expect("test execution failed").success()
}

macro_rules! cases {
    ($($case:ident),+) => {
        $(
            mod $case;
        )+

        pub(crate) fn test_all() {
            use std::process;

            let mut failed = Vec::new();

            $(
                if !$crate::support::test_child(stringify!($case)) {
                    failed.push(stringify!($case));
                }
            )+

            if failed.len() > 0 {
                eprintln!("test execution failed. Failures: {:#?}", failed);
                process::exit(1);
            }
        }

        pub(crate) fn test(name: impl AsRef<str>) {
            let name = name.as_ref();

            $(
                if name == stringify!($case) {
                    use unifiedlog::diagnostics;

                    diagnostics::init(diagnostics::Config {
                        min_level: diagnostics::Level::Debug,
                        ..Default::default()
                    });

                    println!("running {}...", stringify!($case));
                    self::$case::test();

                    diagnostics::stop().expect("failed to stop diagnostics");
                }
            )+
        }
    }
}

pub struct ToReceive {
    pub count: usize,
    pub when_sending: Vec<Vec<u8>>,
}

pub fn plain_expect(to_receive: ToReceive, check: impl Fn(&[Value])) {
    expect(false, to_receive, check)
}

pub fn structured_expect(to_receive: ToReceive, check: impl Fn(&[Value])) {
    expect(true, to_receive, check)
}

fn expect(structured: bool, to_receive: ToReceive, check: impl Fn(&[Value])) {
    let ToReceive {
        count,
        when_sending,
    } = to_receive;

    let received = server::builder()
        .structured(structured)
        .build(server::input(when_sending))
        .finish();

    assert_eq!(
        count,
        received.len(),
        "unexpected number of events: {:#?}",
        received
    );

    check(&received);
}
