use ipconsensus_shared::report::EndpointReport;

const RESET: &str = "\x1b[0m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// One line per endpoint: `<endpoint>: <address>` or `<endpoint>: error: <cause>`.
pub fn format_report(report: &EndpointReport, ansi: bool) -> String {
    let (color, outcome) = match (&report.address, &report.error) {
        (Some(address), _) => (GREEN, address.clone()),
        (None, Some(error)) if report.timed_out => (YELLOW, format!("timeout: {error}")),
        (None, Some(error)) => (RED, format!("error: {error}")),
        (None, None) => (RED, "no answer".to_string()),
    };

    if !ansi {
        return format!("{}: {outcome}", report.endpoint);
    }

    format!(
        "{cyan}{endpoint}{reset}: {color}{outcome}{reset}",
        cyan = CYAN,
        endpoint = report.endpoint,
        reset = RESET,
    )
}
