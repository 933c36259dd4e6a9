use std::io::Cursor;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use autoguide_core::link::spawn_listener;
use autoguide_core::protocol::{parse_telemetry_line, ReportTag, TelemetryRecord};

#[test]
fn test_report_prefixes() {
    let cases = [
        ("FB:O1234", ReportTag::Fb, "1234"),
        ("MC:O-5", ReportTag::Mc, "-5"),
        ("MR:O 17\r\n", ReportTag::Mr, "17"),
        ("#RF:300#", ReportTag::Rf, "300"),
    ];
    for (line, tag, value) in cases {
        assert_eq!(
            parse_telemetry_line(line),
            Some(TelemetryRecord::Report {
                tag,
                value: value.to_string()
            }),
            "{line}"
        );
    }
}

#[test]
fn test_scalar_value() {
    let record = parse_telemetry_line("MC:O-5").unwrap();
    assert_eq!(record.scalar(), Some(-5.0));
    let record = parse_telemetry_line("FB:Oxyz").unwrap();
    assert_eq!(record.scalar(), None);
}

#[test]
fn test_status_line_fields() {
    let record = parse_telemetry_line(":GS:12:30:45#").unwrap();
    assert_eq!(
        record,
        TelemetryRecord::Status(vec!["GS".into(), "12".into(), "30".into(), "45".into()])
    );
}

#[test]
fn test_other_and_blank_lines() {
    assert_eq!(
        parse_telemetry_line("ready"),
        Some(TelemetryRecord::Other("ready".into()))
    );
    assert_eq!(parse_telemetry_line("  \r\n"), None);
    assert_eq!(parse_telemetry_line("\0#"), None);
}

#[test]
fn test_listener_forwards_lines_in_order() {
    let stream = Cursor::new(b"FB:O10\n\n:A:B\nhello".to_vec());
    let shutdown = Arc::new(AtomicBool::new(false));
    let (listener, rx) = spawn_listener(stream, shutdown);

    let records: Vec<TelemetryRecord> = rx.iter().collect();
    listener.stop();

    assert_eq!(
        records,
        vec![
            TelemetryRecord::Report {
                tag: ReportTag::Fb,
                value: "10".into()
            },
            TelemetryRecord::Status(vec!["A".into(), "B".into()]),
            TelemetryRecord::Other("hello".into()),
        ]
    );
}
