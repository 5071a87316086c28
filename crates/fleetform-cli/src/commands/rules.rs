use colored::Colorize;
use fleetform::Config;

pub fn execute(config: &Config) {
    let catalog = config.catalog();

    println!("{}", "Available rules".green().bold());
    println!();
    for kind in catalog.kinds() {
        let Some(handler) = catalog.handler(kind) else {
            continue;
        };
        let param = kind
            .param_name()
            .map(|p| format!(":<{}>", p))
            .unwrap_or_default();
        let note = if handler.skips_falsy() {
            ""
        } else {
            " (runs on empty values)"
        };
        println!(
            "  {}{}  {}{}",
            kind.name().cyan(),
            param.as_str().dimmed(),
            handler.template(),
            note.dimmed()
        );
    }
}
