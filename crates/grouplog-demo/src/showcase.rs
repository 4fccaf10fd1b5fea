//! Walk through every output option of the process-wide registry.

use grouplog::{ConfigUpdate, Level, Logger, Palette, Result};

const SAMPLE: &str = "Lorem ipsum dolor sit amet";

#[derive(Debug)]
#[allow(dead_code)] // fields are only read through Debug
struct Payload
{
    foo: &'static str,
    baz: u32,
}

fn header(title: &str)
{
    let banner = format!(" --- {} ---", title.to_uppercase());
    println!("\n{}\n", Palette::fg(10).paint(&banner));
}

/// Emit the sample message once at every message level.
pub fn print_levels(logger: &Logger) -> Result<()>
{
    for level in Level::ALL.into_iter().filter(|level| !level.is_sentinel()) {
        logger.log(level, SAMPLE, None)?;
    }
    Ok(())
}

/// Run the full walk-through.
///
/// ## Errors
///
/// Propagates logger errors; none are expected with the standard table.
pub fn run() -> Result<()>
{
    grouplog::configure(ConfigUpdate::new().level(Level::Trace));

    let applog = grouplog::logger("app")?;
    let apilog = applog.spawn("api")?;

    header("full (labels)");
    print_levels(&applog)?;

    header("full (icons)");
    grouplog::configure(ConfigUpdate::new().icons(true));
    print_levels(&applog)?;

    header("no milliseconds");
    grouplog::configure(ConfigUpdate::new().milli(false).icons(false));
    print_levels(&applog)?;

    header("no timestamp");
    grouplog::configure(ConfigUpdate::new().timestamp(false));
    print_levels(&applog)?;

    header("no group");
    grouplog::configure(ConfigUpdate::new().group(false));
    print_levels(&applog)?;

    header("warns & errors only");
    applog.set_level(Some(Level::Warning))?;
    print_levels(&applog)?;

    header("no color");
    grouplog::configure(ConfigUpdate::new().color(false));
    print_levels(&applog)?;

    grouplog::configure(
        ConfigUpdate::new()
            .group(true)
            .timestamp(true)
            .milli(true)
            .color(true)
            .icons(false),
    );

    header("local level: global");
    applog.set_level(None)?;
    applog.set_global_level(Level::Error)?;
    print_levels(&applog)?;

    header("local level: independent");
    apilog.set_level(Some(Level::Success))?;
    print_levels(&apilog)?;

    header("paused");
    applog.pause();
    print_levels(&applog)?;
    applog.set_global_level(Level::Trace)?;
    apilog.set_level(None)?;

    header("peer logger");
    print_levels(&apilog)?;

    header("global pause");
    applog.pause_global();
    print_levels(&applog)?;
    print_levels(&apilog)?;

    header("full with data");
    applog.resume_global();
    applog.resume();
    applog.set_level(None)?;
    applog.info_with(SAMPLE, &Payload { foo: "bar", baz: 123 })?;

    println!();
    Ok(())
}
