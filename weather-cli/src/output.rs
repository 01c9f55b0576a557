use std::io::{self, Write};

use weather_core::{DisplayModel, RenderedLine, render_lines};

/// Print one render pass as `label: value` lines.
pub fn print_view(model: &DisplayModel) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_view(&mut out, model)?;
    out.flush()
}

pub fn write_view(out: &mut impl Write, model: &DisplayModel) -> io::Result<()> {
    let lines = render_lines(model);
    if lines.is_empty() {
        return Ok(());
    }

    writeln!(out, "----")?;
    let mut forecast_header = false;
    for RenderedLine { label, text } in &lines {
        // the strip starts at the first date
        if *label == "dateLabel" && !forecast_header {
            writeln!(out, "Upcoming forecast:")?;
            forecast_header = true;
        }
        writeln!(out, "{label:>16}: {text}")?;
    }
    Ok(())
}
