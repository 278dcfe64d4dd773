use std::sync::OnceLock;

use color_eyre::Result;
use tracing::error;

static INIT: OnceLock<()> = OnceLock::new();

/// Install color-eyre report + panic hooks. Calling it twice is a no-op.
pub fn init() -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    // try_into_hooks: kein Panic, falls schon ein Theme gesetzt ist
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .capture_span_trace_by_default(false)
        .display_location_section(cfg!(debug_assertions))
        .display_env_section(false)
        .try_into_hooks()?;
    eyre_hook.install()?;

    std::panic::set_hook(Box::new(move |panic_info| {
        let report = panic_hook.panic_report(panic_info).to_string();
        eprintln!("{report}");
        error!("Error: {}", strip_ansi_escapes::strip_str(report));
        std::process::exit(1);
    }));

    let _ = INIT.set(());
    Ok(())
}
