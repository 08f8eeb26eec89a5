//! ASCII art banner for interactive mode.

use std::io::IsTerminal;

/// ANSI true-color escape sequences for the banner palette.
struct Colors {
    flame: &'static str,
    body: &'static str,
    title: &'static str,
    subtitle: &'static str,
    reset: &'static str,
}

const COLOR: Colors = Colors {
    flame: "\x1b[38;2;255;140;60m",
    body: "\x1b[38;2;160;170;200m",
    title: "\x1b[1;38;2;120;190;255m",
    subtitle: "\x1b[38;2;100;100;120m",
    reset: "\x1b[0m",
};

const PLAIN: Colors = Colors {
    flame: "",
    body: "",
    title: "",
    subtitle: "",
    reset: "",
};

/// Prints the Liftoff banner to stdout.
///
/// Renders ANSI true-color when stdout is a terminal,
/// falls back to plain text otherwise.
pub fn print_banner() {
    let c = if std::io::stdout().is_terminal() {
        &COLOR
    } else {
        &PLAIN
    };

    let fl = c.flame;
    let bd = c.body;
    let tt = c.title;
    let st = c.subtitle;
    let r = c.reset;

    println!(
        r#"
{bd}      /\{r}        {tt}    __    ________________________  ______{r}
{bd}     /  \{r}       {tt}   / /   /  _/ ____/_  __/ __ \/ __/ ____/{r}
{bd}    |    |{r}      {tt}  / /    / // /_    / / / / / / /_/ /_{r}
{bd}    |    |{r}      {tt} / /____/ // __/   / / / /_/ / __/ __/{r}
{bd}   /|    |\{r}     {tt}/_____/___/_/     /_/  \____/_/ /_/{r}
{bd}  /_|____|_\{r}
{fl}    /\/\/\{r}      {st}one entrypoint, any platform{r}
{fl}     \/\/{r}
"#
    );
}
