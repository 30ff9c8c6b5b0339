use chrono::{TimeZone, Utc};
use dlog::{
    Attr, ColorMode, Handler, HandlerOptions, LogError, Logger, PrettyHandler, Record, Severity,
    Style,
};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;
use std::thread;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn sample(severity: Severity) -> Record {
    let time = Utc.with_ymd_and_hms(2023, 5, 15, 10, 30, 0).unwrap();
    Record::at(time, severity, "Test").with_attrs([("key", "value")])
}

#[test]
fn plain_info_scenario() {
    let out = SharedBuffer::default();
    let handler = PrettyHandler::new(out.clone(), HandlerOptions::default());

    handler.handle(&sample(Severity::INFO)).unwrap();

    assert_eq!(
        out.contents(),
        "2023-05-15 10:30:00  [INFO ]  Test key=value\n"
    );
}

#[test]
fn colored_fatal_scenario() {
    let out = SharedBuffer::default();
    let options = HandlerOptions::default()
        .level(Severity::TRACE)
        .color(ColorMode::Always)
        .style(Style::Compact);
    let handler = PrettyHandler::new(out.clone(), options);

    handler.handle(&sample(Severity::FATAL)).unwrap();

    assert_eq!(
        out.contents(),
        "2023-05-15 10:30:00 \x1b[35mFATAL\x1b[0m Test key=value\n"
    );
}

#[test]
fn closed_sink_reports_write_error() {
    let handler = PrettyHandler::new(ClosedPipe, HandlerOptions::default());
    let logger = Logger::new(handler);

    let err = logger.error("lost", &[]).unwrap_err();
    assert!(matches!(err, LogError::Write(_)));
    assert_eq!(err.to_string(), "Failed to write log line: pipe closed");
}

#[test]
fn threshold_is_configurable() {
    let out = SharedBuffer::default();
    let logger = Logger::new(PrettyHandler::new(
        out.clone(),
        HandlerOptions::default().level(Severity::TRACE),
    ));
    logger.trace("visible", &[]).unwrap();

    let quiet = SharedBuffer::default();
    let logger = Logger::new(PrettyHandler::new(quiet.clone(), HandlerOptions::default()));
    logger.trace("hidden", &[]).unwrap();
    logger.debug("hidden", &[]).unwrap();

    assert!(out.contents().contains("[TRACE]  visible"));
    assert_eq!(quiet.contents(), "");
}

#[test]
fn concurrent_lines_do_not_interleave() {
    let out = SharedBuffer::default();
    let logger = Logger::new(PrettyHandler::new(out.clone(), HandlerOptions::default()));

    let workers: Vec<_> = (0..8)
        .map(|worker| {
            let logger = logger.clone();
            thread::spawn(move || {
                for n in 0..50 {
                    logger
                        .info("tick", &[Attr::new("worker", worker), Attr::new("n", n)])
                        .unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let contents = out.contents();
    assert_eq!(contents.lines().count(), 400);
    for line in contents.lines() {
        assert!(line.contains("  [INFO ]  tick worker="), "{:?}", line);
    }
}
