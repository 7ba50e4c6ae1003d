use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber with `report_service=info` on top of `RUST_LOG`.
pub fn init_tracing() {
    init_tracing_with("report_service=info");
}

/// Same as [`init_tracing`], with a caller-chosen default directive list
/// (binaries outside the library target add their own crate name).
pub fn init_tracing_with(default_directives: &str) {
    let mut filter = EnvFilter::from_default_env();
    for directive in default_directives.split(',') {
        match directive.trim().parse() {
            Ok(d) => filter = filter.add_directive(d),
            Err(e) => eprintln!("ignoring invalid log directive '{directive}': {e}"),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
