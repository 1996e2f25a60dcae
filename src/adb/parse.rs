use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSummary {
    pub serial: String,
    pub state: String,
    pub model: Option<String>,
}

/// Parse `adb devices -l` output. The header line and daemon chatter are
/// skipped; whatever remains is one device per line.
pub fn parse_devices(output: &str) -> Vec<DeviceSummary> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !line.trim_start().starts_with('*'))
        .filter(|line| !line.to_lowercase().contains("list of devices"))
        .filter_map(|line| {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() < 2 {
                return None;
            }
            let model = tokens
                .iter()
                .skip(2)
                .find_map(|token| token.strip_prefix("model:"))
                .map(|value| value.to_string());
            Some(DeviceSummary {
                serial: tokens[0].to_string(),
                state: tokens[1].to_string(),
                model,
            })
        })
        .collect()
}

/// Extract `(width, height)` from `wm size` output, e.g.
/// `Physical size: 1080x1920`.
pub fn parse_screen_size(output: &str) -> Option<(u32, u32)> {
    let re = Regex::new(r":\s+(\d+)x(\d+)").ok()?;
    let caps = re.captures(output)?;
    let width = caps[1].parse().ok()?;
    let height = caps[2].parse().ok()?;
    Some((width, height))
}

/// Extract the `level` field from `dumpsys battery` output. Lines are
/// colon-separated key/value pairs surrounded by dump noise.
pub fn parse_battery_level(output: &str) -> Option<u8> {
    for line in output.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        if key.trim() == "level" {
            return value.trim().parse().ok();
        }
    }
    None
}

/// Extract `(package, activity)` from the focused-window line of
/// `dumpsys window`, e.g. `mCurrentFocus=Window{... com.foo.bar/com.foo.bar.MainActivity}`.
pub fn parse_running_activity(output: &str) -> Option<(String, String)> {
    let re = Regex::new(r"((?:\w|\.)+)/((?:\w|\.)+)").ok()?;
    let caps = re.captures(output)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

/// Find the dump-file path announced by `uiautomator dump`, e.g.
/// `UI hierchary dumped to: /sdcard/window_dump.xml`.
pub fn parse_dump_file_path(output: &str) -> Option<String> {
    let re = Regex::new(r"(\S+\.xml)").ok()?;
    let caps = re.captures(output)?;
    Some(caps[1].to_string())
}

/// Split dumpsys output into lines, keeping only lines that contain `term`
/// when a filter term is given.
pub fn filter_dump_lines(output: &str, term: Option<&str>) -> Vec<String> {
    output
        .lines()
        .filter(|line| term.map_or(true, |needle| line.contains(needle)))
        .map(|line| line.to_string())
        .collect()
}

/// `pm list packages <name>` match: the trimmed package name must appear as
/// a literal substring of the output.
pub fn package_listed(output: &str, package_name: &str) -> bool {
    output.contains(package_name.trim())
}
