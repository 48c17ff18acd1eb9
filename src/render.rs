use crate::config::OutputFormat;
use crate::eventlog::summary::ClassificationSummary;
use crate::eventlog::LogReportView;
use crate::report::{CpuInfo, DiskInfo, MemInfo, Report, SystemInfo};
use crate::units::{format_bytes, format_percent, format_uptime};
use std::fs;
use std::path::Path;
use thiserror::Error;

const NOT_AVAILABLE: &str = "n/a";

const STYLE: &str = "\
:root{--bg:#0b1320;--card:#121a2b;--muted:#9aa4b2;--text:#e6edf3;--ok:#12b886;--warn:#f59f00;--b:#22304a;--tbl:#162139}
html,body{background:var(--bg);color:var(--text);font-family:system-ui,-apple-system,Segoe UI,Roboto,Ubuntu,sans-serif;margin:0;padding:0}
.wrap{max-width:1100px;margin:32px auto;padding:0 16px}
.hdr{display:flex;justify-content:space-between;align-items:center;margin-bottom:16px}
.h1{font-size:24px;font-weight:700}
.time,.small,.footer{color:var(--muted)}
.time{font-size:14px}
.grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(280px,1fr));gap:16px}
.card{background:var(--card);border:1px solid var(--b);border-radius:12px;padding:16px;margin-top:16px}
.card h2{margin:.2rem 0 .8rem;font-size:16px}
.kv{display:grid;grid-template-columns:1fr 1fr;gap:6px 12px;font-size:14px}
.kv div{padding:2px 0;border-bottom:1px dashed rgba(255,255,255,.06)}
.tbl{width:100%;border-collapse:collapse;font-size:14px;background:var(--tbl);border:1px solid var(--b)}
.tbl th,.tbl td{padding:8px 10px;border-bottom:1px solid var(--b);text-align:left;vertical-align:top}
.tbl th{font-weight:600;background:#0f1a2f}
.badge{display:inline-block;padding:2px 8px;border-radius:999px;font-size:12px}
.badge.ok{color:var(--ok);border:1px solid rgba(18,184,134,.4)}
.badge.warn{color:var(--warn);border:1px solid rgba(245,159,0,.4)}
pre{white-space:pre-wrap;word-wrap:break-word;background:#0f1a2f;border:1px solid var(--b);padding:12px;border-radius:8px;margin:0}
.small,.footer{font-size:12px}
.footer{margin-top:20px;text-align:center}";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to render report: {0}")]
    Render(#[from] serde_json::Error),
    #[error("failed to write report to {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

pub fn render(report: &Report, format: OutputFormat) -> Result<String, ReportError> {
    match format {
        OutputFormat::Html => Ok(render_html(report)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

/// Renders and overwrites `path` in one write.
pub fn write_report(
    report: &Report,
    format: OutputFormat,
    path: impl AsRef<Path>,
) -> Result<(), ReportError> {
    let path = path.as_ref();
    let document = render(report, format)?;
    fs::write(path, document).map_err(|source| ReportError::Write {
        path: path.display().to_string(),
        source,
    })
}

pub fn render_html(report: &Report) -> String {
    let title = escape(&report.title);
    let generated = report.generated_at.format("%Y-%m-%d %H:%M:%S %Z").to_string();

    let out = vec![
        "<!DOCTYPE html>".to_string(),
        "<html lang=\"en\">".to_string(),
        "<head>".to_string(),
        "<meta charset=\"utf-8\">".to_string(),
        format!("<title>{title}</title>"),
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">".to_string(),
        format!("<style>\n{STYLE}\n</style>"),
        "</head>".to_string(),
        "<body>".to_string(),
        "<div class=\"wrap\">".to_string(),
        format!(
            "<div class=\"hdr\"><div class=\"h1\">{title}</div><div class=\"time\">{}</div></div>",
            escape(&generated)
        ),
        "<div class=\"grid\">".to_string(),
        system_section(&report.system),
        cpu_section(&report.cpu),
        memory_section(&report.memory),
        "</div>".to_string(),
        disk_section(&report.disks),
        event_log_section(&report.event_log),
        format!(
            "<div class=\"footer\">Generated on {}</div>",
            escape(&report.generated_at.format("%Y-%m-%d %H:%M:%S %z").to_string())
        ),
        "</div>".to_string(),
        "</body>".to_string(),
        "</html>".to_string(),
    ];

    out.join("\n")
}

fn system_section(s: &SystemInfo) -> String {
    let rows = [
        ("Hostname", opt_text(&s.host_name)),
        ("OS", opt_text(&s.os)),
        ("Platform", opt_text(&s.platform)),
        ("Platform Version", opt_text(&s.platform_version)),
        ("Kernel", opt_text(&s.kernel_version)),
        ("Arch", s.architecture.clone()),
        (
            "Uptime",
            format!(
                "{} ({:.2} days)",
                format_uptime(s.uptime_seconds),
                s.uptime_days
            ),
        ),
    ];
    card("System Information", &kv(&rows))
}

fn cpu_section(c: &CpuInfo) -> String {
    let mut rows = vec![
        ("Logical CPUs", c.logical_cpus.to_string()),
        (
            "Physical CPUs",
            c.physical_cpus
                .map(|v| v.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
        ("Model", opt_text(&c.model)),
        ("MHz", c.frequency_mhz.to_string()),
    ];
    if let Some(v) = c.usage_overall_percent {
        rows.push(("Usage (overall)", format_percent(v)));
    }
    rows.push((
        "Load Average",
        format!(
            "1m {:.2}, 5m {:.2}, 15m {:.2}",
            c.load.one, c.load.five, c.load.fifteen
        ),
    ));
    rows.push((
        "User/System/Idle/IOwait (s)",
        format!(
            "{:.2} / {:.2} / {:.2} / {:.2}",
            c.times.user, c.times.system, c.times.idle, c.times.iowait
        ),
    ));

    let mut body = kv(&rows);
    if !c.usage_per_cpu_percent.is_empty() {
        let per_cpu = c
            .usage_per_cpu_percent
            .iter()
            .enumerate()
            .map(|(i, v)| escaped(&[format!("CPU {i}"), format_percent(*v)]))
            .collect::<Vec<_>>();
        body.push_str("\n<div class=\"small\" style=\"margin-top:8px;\">Per-CPU usage:</div>\n");
        body.push_str(&table(&["CPU", "Usage"], &per_cpu));
    }
    card("CPU", &body)
}

fn memory_section(m: &MemInfo) -> String {
    let mut rows = vec![
        ("Total", format_bytes(m.total)),
        ("Available", format_bytes(m.available)),
        ("Used", format_bytes(m.used)),
        ("Used %", format_percent(m.used_percent)),
        ("Free", format_bytes(m.free)),
        ("Cached", format_bytes(m.cached)),
        ("Buffers", format_bytes(m.buffers)),
    ];
    let optional = [
        ("Active", m.active),
        ("Inactive", m.inactive),
        ("Shared", m.shared),
    ];
    for (label, value) in optional {
        if let Some(v) = value {
            rows.push((label, format_bytes(v)));
        }
    }
    rows.extend([
        ("Swap Total", format_bytes(m.swap_total)),
        (
            "Swap Used",
            format!(
                "{} ({})",
                format_bytes(m.swap_used),
                format_percent(m.swap_used_percent)
            ),
        ),
        ("Swap Free", format_bytes(m.swap_free)),
        (
            "Swap In/Out",
            format!("{} / {}", format_bytes(m.swap_in), format_bytes(m.swap_out)),
        ),
    ]);
    card("Memory", &kv(&rows))
}

fn disk_section(d: &DiskInfo) -> String {
    let threshold = format!("&gt; {:.0}%", d.warn_threshold_percent);
    let usage_rows = d
        .rows
        .iter()
        .map(|r| {
            let status = if r.warn {
                format!("<span class=\"badge warn\">{threshold}</span>")
            } else {
                "<span class=\"badge ok\">OK</span>".to_string()
            };
            let mut cells = escaped(&[
                r.mount.clone(),
                r.fs_type.clone(),
                r.device.clone(),
                format_bytes(r.total_bytes),
                format_bytes(r.used_bytes),
                format_bytes(r.free_bytes),
                format_percent(r.used_percent),
            ]);
            cells.push(status);
            cells
        })
        .collect::<Vec<_>>();
    let mut body = table(
        &[
            "Mountpoint",
            "FS Type",
            "Device",
            "Total",
            "Used",
            "Free",
            "Use%",
            "Status",
        ],
        &usage_rows,
    );

    body.push_str("\n<div style=\"margin-top:8px;\">");
    if d.warnings > 0 {
        body.push_str(&format!(
            "<span class=\"badge warn\">{} filesystem(s) {threshold}</span>",
            d.warnings
        ));
    } else {
        body.push_str(&format!(
            "<span class=\"badge ok\">All filesystems below {:.0}%</span>",
            d.warn_threshold_percent
        ));
    }
    body.push_str("</div>");

    if !d.io.is_empty() {
        let io_rows = d
            .io
            .iter()
            .map(|s| {
                escaped(&[
                    s.name.clone(),
                    s.read_count.to_string(),
                    s.write_count.to_string(),
                    format_bytes(s.read_bytes),
                    format_bytes(s.write_bytes),
                    s.read_time_ms.to_string(),
                    s.write_time_ms.to_string(),
                ])
            })
            .collect::<Vec<_>>();
        body.push_str("\n<h3 style=\"margin-top:16px;\">Disk I/O</h3>\n");
        body.push_str(&table(
            &[
                "Device",
                "Read Cnt",
                "Write Cnt",
                "Read Bytes",
                "Write Bytes",
                "Read Time (ms)",
                "Write Time (ms)",
            ],
            &io_rows,
        ));
    }
    card("Disk Usage", &body)
}

fn event_log_section(v: &LogReportView) -> String {
    let mut body = String::new();
    if let Some(note) = &v.note {
        body.push_str(&format!(
            "<div class=\"small\" style=\"margin-bottom:8px;\">{}</div>\n",
            escape(note)
        ));
    }
    body.push_str("<div class=\"grid\">\n");
    body.push_str(&card("Summary (All Time)", &summary_kv(&v.all_time)));
    body.push('\n');
    body.push_str(&card(
        &format!("Summary (Last {}h)", v.window_hours),
        &summary_kv(&v.recent),
    ));
    body.push_str("\n</div>\n");

    if v.recent_transcript.is_empty() {
        body.push_str(&format!(
            "<div class=\"small\" style=\"margin-top:8px;\">No errors in the last {} hours.</div>",
            v.window_hours
        ));
    } else {
        body.push_str(&format!(
            "<h3 style=\"margin-top:12px;\">All Errors in the Last {} Hours</h3>\n<pre>{}</pre>",
            v.window_hours,
            escape(&v.recent_transcript)
        ));
    }
    card("Recent OS Errors", &body)
}

fn summary_kv(s: &ClassificationSummary) -> String {
    kv(&[
        ("Total", s.total.to_string()),
        ("Permanent", s.permanent.to_string()),
        ("Temporary", s.temporary.to_string()),
        ("Informational", s.informational.to_string()),
        ("Unknown", s.unknown.to_string()),
    ])
}

fn card(heading: &str, body: &str) -> String {
    format!(
        "<section class=\"card\">\n<h2>{}</h2>\n{body}\n</section>",
        escape(heading)
    )
}

fn kv(rows: &[(&str, String)]) -> String {
    let cells = rows
        .iter()
        .map(|(k, v)| format!("<div>{}</div><div>{}</div>", escape(k), escape(v)))
        .collect::<Vec<_>>()
        .join("\n");
    format!("<div class=\"kv\">\n{cells}\n</div>")
}

/// `rows` hold cell markup; callers escape plain text with [`escaped`].
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let head = headers
        .iter()
        .map(|h| format!("<th>{}</th>", escape(h)))
        .collect::<String>();
    let body = rows
        .iter()
        .map(|r| {
            let cells = r
                .iter()
                .map(|c| format!("<td>{c}</td>"))
                .collect::<String>();
            format!("<tr>{cells}</tr>")
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("<table class=\"tbl\">\n<thead><tr>{head}</tr></thead>\n<tbody>\n{body}\n</tbody>\n</table>")
}

fn escaped(cells: &[String]) -> Vec<String> {
    cells.iter().map(|c| escape(c)).collect()
}

fn opt_text(v: &Option<String>) -> String {
    v.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{DiskUsageRow, LoadAverage};
    use chrono::{Local, TimeZone};

    fn sample_report() -> Report {
        Report {
            generated_at: Local.with_ymd_and_hms(2025, 10, 3, 12, 0, 0).unwrap(),
            title: "AIX <Power9> Health".to_string(),
            system: SystemInfo {
                host_name: Some("db01".to_string()),
                architecture: "powerpc64".to_string(),
                uptime_seconds: 172_800,
                uptime_days: 2.0,
                ..SystemInfo::default()
            },
            cpu: CpuInfo {
                logical_cpus: 2,
                usage_overall_percent: Some(12.5),
                usage_per_cpu_percent: vec![10.0, 15.0],
                load: LoadAverage {
                    one: 0.5,
                    five: 0.25,
                    fifteen: 0.125,
                },
                ..CpuInfo::default()
            },
            memory: MemInfo {
                total: 8 * 1024 * 1024 * 1024,
                available: 1536,
                ..MemInfo::default()
            },
            disks: DiskInfo::from_rows(
                vec![DiskUsageRow {
                    mount: "/var".to_string(),
                    fs_type: "jfs2".to_string(),
                    device: "/dev/hd9var".to_string(),
                    total_bytes: 1024,
                    used_bytes: 1000,
                    free_bytes: 24,
                    used_percent: 97.66,
                    warn: false,
                }],
                80.0,
                Vec::new(),
            ),
            event_log: LogReportView {
                all_time: ClassificationSummary {
                    total: 3,
                    permanent: 2,
                    unknown: 1,
                    ..ClassificationSummary::default()
                },
                recent: ClassificationSummary {
                    total: 1,
                    permanent: 1,
                    ..ClassificationSummary::default()
                },
                recent_transcript: "LABEL: SC_DISK_ERR2\nDetail <sense> & data".to_string(),
                window_hours: 24,
                note: None,
            },
        }
    }

    #[test]
    fn html_contains_sections_and_escapes_text() {
        let html = render_html(&sample_report());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>AIX &lt;Power9&gt; Health</title>"));
        assert!(html.contains("<div>Hostname</div><div>db01</div>"));
        assert!(html.contains("<div>Total</div><div>8.00 GB</div>"));
        assert!(html.contains("<div>Available</div><div>1.50 KB</div>"));
        assert!(html.contains("<div>Usage (overall)</div><div>12.50%</div>"));
        assert!(html.contains("<td>CPU 1</td><td>15.00%</td>"));
        assert!(html.contains("Summary (Last 24h)"));
        assert!(html.contains("<div>Permanent</div><div>2</div>"));
        assert!(html.contains("Detail &lt;sense&gt; &amp; data"));
        assert!(!html.contains("No errors in the last"));
        assert!(!html.contains("Disk I/O"));
    }

    #[test]
    fn html_flags_filesystems_over_threshold() {
        let html = render_html(&sample_report());
        assert!(html.contains("<span class=\"badge warn\">&gt; 80%</span>"));
        assert!(html.contains("1 filesystem(s) &gt; 80%"));
    }

    #[test]
    fn html_reports_note_and_empty_window() {
        let mut report = sample_report();
        report.disks = DiskInfo::from_rows(Vec::new(), 80.0, Vec::new());
        report.event_log = LogReportView {
            window_hours: 24,
            note: Some("Error invoking errpt: could not start command".to_string()),
            ..LogReportView::default()
        };

        let html = render_html(&report);
        assert!(html.contains("Error invoking errpt: could not start command"));
        assert!(html.contains("No errors in the last 24 hours."));
        assert!(html.contains("All filesystems below 80%"));
        assert!(!html.contains("<pre>"));
    }

    #[test]
    fn json_output_serializes_model() {
        let text = render(&sample_report(), OutputFormat::Json).expect("json renders");
        let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
        assert_eq!(value["event_log"]["all_time"]["permanent"], 2);
        assert_eq!(value["disks"]["warnings"], 1);
        assert_eq!(value["system"]["host_name"], "db01");
    }

    #[test]
    fn write_report_overwrites_file() {
        let path = std::env::temp_dir().join(format!("healthcheck-{}.html", std::process::id()));
        std::fs::write(&path, "stale").expect("seed file");

        write_report(&sample_report(), OutputFormat::Html, &path).expect("report written");
        let written = std::fs::read_to_string(&path).expect("read back");
        let _ = std::fs::remove_file(&path);

        assert!(written.starts_with("<!DOCTYPE html>"));
        assert!(!written.contains("stale"));
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let err = write_report(
            &sample_report(),
            OutputFormat::Html,
            "/nonexistent-dir/health_check.html",
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::Write { .. }));
    }
}
