//! Tests for level filtering, muting and output routing

use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use grouplog::{
    CaptureSink, ConfigUpdate, GlobalConfig, Level, LevelDef, LevelTable, LoggerError, Registry, Sink, Stream,
};

/// Registry with plain, untimed output so lines can be compared exactly.
fn plain_registry() -> (Registry, Arc<CaptureSink>)
{
    let sink = Arc::new(CaptureSink::new());
    let registry = Registry::with_sink(GlobalConfig::default(), sink.clone());
    registry.configure(ConfigUpdate::new().timestamp(false).color(false));
    (registry, sink)
}

fn message_levels() -> impl Iterator<Item = Level>
{
    Level::ALL.into_iter().filter(|level| !level.is_sentinel())
}

#[test]
fn test_is_loggable_matches_severity_order()
{
    let (registry, _) = plain_registry();
    let logger = registry.resolve("app").unwrap();
    let table = LevelTable::standard();

    for threshold in Level::ALL {
        logger.set_level(Some(threshold)).unwrap();
        for level in message_levels() {
            let expected = table.severity(level).unwrap() >= table.severity(threshold).unwrap();
            assert_eq!(logger.is_loggable(level).unwrap(), expected, "{level} at {threshold}");
        }
    }
}

#[test]
fn test_threshold_level_itself_is_loggable()
{
    let (registry, sink) = plain_registry();
    let logger = registry.resolve("app").unwrap();

    for level in message_levels() {
        logger.set_level(Some(level)).unwrap();
        assert!(logger.log(level, "edge", None).unwrap(), "{level}");
    }
    assert_eq!(sink.lines().len(), 13);
}

#[test]
fn test_global_warning_drops_info_and_routes_error_to_stderr()
{
    let (registry, sink) = plain_registry();
    registry.configure(ConfigUpdate::new().level(Level::Warning));
    let logger = registry.resolve("app").unwrap();

    assert!(!logger.info("quiet").unwrap());
    assert!(sink.is_empty());

    assert!(logger.error("loud").unwrap());
    assert_eq!(sink.stdout(), "");
    assert_eq!(sink.stderr(), "[app|error] loud\n");
}

#[test]
fn test_routing_follows_error_threshold()
{
    let (registry, sink) = plain_registry();
    registry.configure(ConfigUpdate::new().level(Level::Trace));
    let logger = registry.resolve("app").unwrap();

    logger.notice("below").unwrap();
    logger.warning("at").unwrap();
    registry.configure(ConfigUpdate::new().error_threshold(99));
    logger.fatal("raised").unwrap();

    assert_eq!(
        sink.lines(),
        vec![
            (Stream::Stdout, "[app|notice] below".to_string()),
            (Stream::Stderr, "[app|warning] at".to_string()),
            (Stream::Stdout, "[app|fatal] raised".to_string()),
        ]
    );
}

#[test]
fn test_peer_loggers_filter_independently()
{
    let (registry, sink) = plain_registry();
    let app = registry.resolve("app").unwrap();
    let api = app.spawn("api").unwrap();

    app.set_global_level(Level::Trace).unwrap();
    api.set_level(Some(Level::Success)).unwrap();

    assert!(app.trace("app trace").unwrap());
    assert!(!api.trace("api trace").unwrap());
    assert!(!api.dev("api dev").unwrap());
    assert!(api.ok("api ok").unwrap());
    assert!(api.info("api info").unwrap());

    assert_eq!(
        sink.stdout(),
        "[app|trace] app trace\n[api|ok] api ok\n[api|info] api info\n"
    );
}

#[test]
fn test_global_level_change_reaches_followers_only()
{
    let (registry, _) = plain_registry();
    let follower = registry.resolve("follower").unwrap();
    let pinned = registry.resolve(("pinned", Level::Trace)).unwrap();

    follower.set_global_level(Level::Error).unwrap();

    assert!(!follower.is_loggable(Level::Warning).unwrap());
    assert!(pinned.is_loggable(Level::Warning).unwrap());

    pinned.set_level(None).unwrap();
    assert!(!pinned.is_loggable(Level::Warning).unwrap());
}

#[test]
fn test_pause_suppresses_even_fatal()
{
    let (registry, sink) = plain_registry();
    let logger = registry.resolve(("app", Level::All)).unwrap();

    logger.pause();
    for level in message_levels() {
        assert!(!logger.log(level, "muted", None).unwrap());
    }
    assert!(sink.is_empty());

    logger.resume();
    assert!(logger.fatal("back").unwrap());
    assert!(logger.trace("back").unwrap());
    assert_eq!(sink.lines().len(), 2);
}

#[test]
fn test_pause_keeps_level()
{
    let (registry, _) = plain_registry();
    let logger = registry.resolve(("app", Level::Error)).unwrap();

    logger.pause();
    logger.resume();

    assert_eq!(logger.level(), Some(Level::Error));
    assert!(!logger.is_loggable(Level::Warning).unwrap());
    assert!(logger.is_loggable(Level::Error).unwrap());
}

#[test]
fn test_global_pause_mutes_every_logger()
{
    let (registry, sink) = plain_registry();
    registry.configure(ConfigUpdate::new().level(Level::Trace));
    let app = registry.resolve("app").unwrap();
    let api = registry.resolve(("api", Level::All)).unwrap();

    app.pause_global();
    assert!(!app.fatal("x").unwrap());
    assert!(!api.fatal("x").unwrap());
    assert!(sink.is_empty());

    api.resume_global();
    assert!(app.info("y").unwrap());
    assert!(api.info("y").unwrap());
    assert_eq!(sink.lines().len(), 2);
}

#[test]
fn test_no_level_anywhere_is_an_error()
{
    let (registry, sink) = plain_registry();
    let logger = registry.resolve("app").unwrap();

    assert!(matches!(logger.is_loggable(Level::Info), Err(LoggerError::InvalidLevel(_))));
    assert!(matches!(logger.info("lost"), Err(LoggerError::InvalidLevel(_))));
    assert!(sink.is_empty());

    // muting is checked first
    logger.pause();
    assert!(!logger.info("lost").unwrap());
}

#[test]
fn test_global_trace_level_from_text_logs_everything()
{
    let (registry, sink) = plain_registry();
    let logger = registry.resolve("app").unwrap();

    registry.configure("level=trace".parse::<ConfigUpdate>().unwrap());

    for level in message_levels() {
        assert!(logger.log(level, "x", None).unwrap(), "{level}");
    }
    assert_eq!(sink.lines().len(), message_levels().count());
}

#[test]
fn test_set_level_bogus_name_changes_nothing()
{
    let (registry, _) = plain_registry();
    let logger = registry.resolve(("app", Level::Notice)).unwrap();

    assert!(matches!(
        logger.set_level_name(Some("bogus-level")),
        Err(LoggerError::InvalidLevel(name)) if name == "bogus-level"
    ));
    assert_eq!(logger.level(), Some(Level::Notice));

    logger.set_level_name(None).unwrap();
    assert_eq!(logger.level(), None);
    logger.set_level_name(Some("alert")).unwrap();
    assert_eq!(logger.level(), Some(Level::Alert));
}

#[test]
fn test_set_global_level_bogus_name_changes_nothing()
{
    let (registry, _) = plain_registry();
    let logger = registry.resolve("app").unwrap();
    logger.set_global_level(Level::Info).unwrap();

    assert!(matches!(logger.set_global_level_name("loud"), Err(LoggerError::InvalidLevel(_))));
    assert_eq!(registry.config().level, Some(Level::Info));

    logger.set_global_level_name("critical").unwrap();
    assert_eq!(registry.config().level, Some(Level::Critical));
}

#[test]
fn test_sentinels_are_not_message_levels()
{
    let (registry, sink) = plain_registry();
    let logger = registry.resolve(("app", Level::All)).unwrap();

    assert!(matches!(logger.log(Level::Off, "x", None), Err(LoggerError::InvalidLevel(_))));
    assert!(matches!(logger.log(Level::All, "x", None), Err(LoggerError::InvalidLevel(_))));
    assert!(sink.is_empty());
}

#[test]
fn test_replaced_table_missing_level()
{
    let (registry, _) = plain_registry();
    let logger = registry.resolve(("app", Level::Trace)).unwrap();
    registry.configure(ConfigUpdate::new().levels(LevelTable::standard().without(Level::Notice)));

    assert!(matches!(logger.notice("x"), Err(LoggerError::InvalidLevel(_))));
    assert!(matches!(logger.set_level(Some(Level::Notice)), Err(LoggerError::InvalidLevel(_))));
    assert_eq!(logger.level(), Some(Level::Trace));
    assert!(logger.info("still fine").unwrap());
}

#[test]
fn test_replaced_table_changes_ranking()
{
    let (registry, _) = plain_registry();
    let logger = registry.resolve(("app", Level::Warning)).unwrap();
    assert!(!logger.is_loggable(Level::Debug).unwrap());

    let promoted = LevelTable::standard().with(Level::Debug, LevelDef::new(70, 'D', None));
    registry.configure(ConfigUpdate::new().levels(promoted));

    assert!(logger.is_loggable(Level::Debug).unwrap());
}

#[test]
fn test_line_layout_options()
{
    let (registry, sink) = plain_registry();
    registry.configure(ConfigUpdate::new().level(Level::Trace));
    let logger = registry.resolve("app").unwrap();

    logger.info("labels").unwrap();
    registry.configure(ConfigUpdate::new().icons(true));
    logger.info("icons").unwrap();
    registry.configure(ConfigUpdate::new().group(false));
    logger.ok("no group").unwrap();

    assert_eq!(sink.stdout(), "[app|info] labels\n[app|I] icons\n[✔] no group\n");
}

#[test]
fn test_timestamp_prefix()
{
    let (registry, sink) = plain_registry();
    registry.configure(ConfigUpdate::new().level(Level::Trace).timestamp(true).milli(false));
    let logger = registry.resolve("app").unwrap();

    logger.info("timed").unwrap();

    let out = sink.stdout();
    let (stamp, rest) = out.split_at(19);
    assert_eq!(rest, " [app|info] timed\n");
    assert_eq!(stamp.as_bytes()[4], b'-');
    assert_eq!(stamp.as_bytes()[10], b' ');
    assert_eq!(stamp.as_bytes()[13], b':');
}

#[test]
fn test_data_goes_to_same_stream()
{
    let (registry, sink) = plain_registry();
    registry.configure(ConfigUpdate::new().level(Level::Trace));
    let logger = registry.resolve("app").unwrap();
    let data: BTreeMap<&str, i32> = [("baz", 123)].into_iter().collect();

    logger.error_with("with data", &data).unwrap();

    assert_eq!(sink.stdout(), "");
    let err = sink.stderr();
    assert!(err.starts_with("[app|error] with data\n{\n"));
    assert!(err.contains("\"baz\": 123"));
    assert!(err.ends_with("}\n"));
}

#[test]
fn test_no_color_output_has_no_escapes()
{
    let (registry, sink) = plain_registry();
    registry.configure(ConfigUpdate::new().level(Level::Trace));
    let logger = registry.resolve("app").unwrap();

    logger.critical_with("plain", &vec![1, 2, 3]).unwrap();

    assert!(!sink.stderr().contains('\u{1b}'));
}

/// Records each write as one chunk and stalls after writes from the `slow` group.
#[derive(Default)]
struct StallingSink
{
    chunks: Mutex<Vec<String>>,
}

impl StallingSink
{
    fn chunks(&self) -> Vec<String>
    {
        self.chunks.lock().unwrap().clone()
    }
}

impl Sink for StallingSink
{
    fn write(&self, _stream: Stream, text: &str) -> io::Result<()>
    {
        self.chunks.lock().unwrap().push(text.to_string());
        if text.starts_with("[slow|") {
            thread::sleep(Duration::from_millis(200));
        }
        Ok(())
    }
}

#[test]
fn test_data_dump_stays_with_its_line_across_threads()
{
    let sink = Arc::new(StallingSink::default());
    let registry = Registry::with_sink(GlobalConfig::default(), sink.clone());
    registry.configure(ConfigUpdate::new().level(Level::Trace).timestamp(false).color(false));
    let slow = registry.resolve("slow").unwrap();
    let fast = registry.resolve("fast").unwrap();

    let writer = thread::spawn(move || slow.info_with("with data", &vec![1, 2]).unwrap());
    while sink.chunks().is_empty() {
        thread::sleep(Duration::from_millis(5));
    }
    fast.info("intruder").unwrap();
    assert!(writer.join().unwrap());

    assert_eq!(
        sink.chunks(),
        vec![
            "[slow|info] with data\n[\n    1,\n    2,\n]\n".to_string(),
            "[fast|info] intruder\n".to_string(),
        ]
    );
}

#[test]
fn test_loggers_shared_across_threads()
{
    let (registry, sink) = plain_registry();
    registry.configure(ConfigUpdate::new().level(Level::Trace));

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let registry = registry.clone();
            thread::spawn(move || {
                let logger = registry.resolve(format!("worker{}", n % 4)).unwrap();
                for i in 0..25 {
                    logger.info_with("tick", &i).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(registry.len(), 4);
    let lines = sink.lines();
    assert_eq!(lines.len(), 8 * 25 * 2);
    for pair in lines.chunks(2) {
        assert!(pair[0].1.ends_with("] tick"), "{pair:?}");
        assert!(pair[1].1.parse::<u32>().is_ok(), "{pair:?}");
    }
}
