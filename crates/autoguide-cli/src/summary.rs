use console::Style;

use autoguide_core::config::GuideConfig;
use autoguide_core::pipeline::SessionSummary;
use autoguide_core::region::ViewState;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn on_off(s: &Styles, on: bool) -> String {
    if on {
        s.method.apply_to("on").to_string()
    } else {
        s.disabled.apply_to("off").to_string()
    }
}

pub fn print_config_summary(config: &GuideConfig, view: &ViewState, source: &str, link: Option<&str>) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Autoguider"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(10)));
    println!();

    println!("  {:<14}{}", s.label.apply_to("Source"), s.path.apply_to(source));
    match link {
        Some(name) => println!("  {:<14}{}", s.label.apply_to("Mount"), s.path.apply_to(name)),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Mount"),
            s.disabled.apply_to("not connected")
        ),
    }
    println!();

    println!("  {}", s.header.apply_to("Detection"));
    println!(
        "    {:<16}{}",
        s.label.apply_to("Window"),
        s.value.apply_to(format!(
            "{0}x{0} at ({1}, {2})",
            config.window_side(),
            view.center_x,
            view.center_y
        ))
    );
    println!("    {:<16}{}", s.label.apply_to("Circular mask"), on_off(&s, config.circular_mask));
    println!("    {:<16}{}", s.label.apply_to("Threshold"), s.method.apply_to(config.threshold));
    println!("    {:<16}{}", s.label.apply_to("Binning"), s.value.apply_to(config.binning));
    println!(
        "    {:<16}{}",
        s.label.apply_to("Noise"),
        s.value.apply_to(format!("{} ({:?})", config.noise_level, config.noise_occupancy))
    );
    println!("    {:<16}{}", s.label.apply_to("Contrast limit"), s.value.apply_to(config.contrast_limit));
    println!();

    println!("  {}", s.header.apply_to("Control"));
    println!("    {:<16}{}", s.label.apply_to("Guiding"), on_off(&s, config.auto_guide));
    println!(
        "    {:<16}{}",
        s.label.apply_to("Scale"),
        s.value.apply_to(format!(
            "{:.1} ms/px (zoom {})",
            view.transform.ms_per_pixel(config.scale_ms_per_pixel),
            view.transform.zoom.level()
        ))
    );
    println!(
        "    {:<16}{}",
        s.label.apply_to("Dead-band"),
        s.value.apply_to(format!("{} ms", config.min_correction_ms))
    );
    println!(
        "    {:<16}{}",
        s.label.apply_to("Interval"),
        s.value.apply_to(format!("{} frames", config.interval_frames))
    );
    for (name, axis) in [("RA", &config.ra), ("DEC", &config.dec)] {
        let state = if !axis.enabled {
            s.disabled.apply_to("disabled").to_string()
        } else if axis.inverted {
            s.method.apply_to("inverted").to_string()
        } else {
            s.method.apply_to("direct").to_string()
        };
        println!("    {:<16}{}", s.label.apply_to(name), state);
    }
    println!();
}

pub fn print_session_summary(summary: &SessionSummary) {
    let s = Styles::new();

    println!();
    println!("  {}", s.header.apply_to("Session"));
    println!("    {:<16}{}", s.label.apply_to("Stopped"), s.value.apply_to(summary.stop_reason));
    println!(
        "    {:<16}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(format!("{} ({} with a star)", summary.frames, summary.valid_frames))
    );
    println!("    {:<16}{}", s.label.apply_to("Intervals"), s.value.apply_to(summary.intervals));
    println!(
        "    {:<16}{}",
        s.label.apply_to("Corrections"),
        s.value.apply_to(format!(
            "{} sent, {} dropped",
            summary.corrections_sent, summary.corrections_dropped
        ))
    );
    println!(
        "    {:<16}{}",
        s.label.apply_to("Pulse time"),
        s.value.apply_to(format!(
            "RA {} ms, DEC {} ms",
            summary.ra_ms_sent, summary.dec_ms_sent
        ))
    );
    if let Some(ref last) = summary.last_report {
        println!(
            "    {:<16}{}",
            s.label.apply_to("Last offset"),
            s.value.apply_to(format!("dx {:+} dy {:+}", last.estimate.dx, last.estimate.dy))
        );
    }
    println!();
}
