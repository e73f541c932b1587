use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::info;
use std::time::Duration;

use crate::config::CalendarConfig;

/// 渲染用的日程事件
#[derive(Debug, Clone)]
pub struct Event {
    pub title: String,
    pub start: String,
    pub end: String,
    pub location: String,
    pub link: String,
}

/// Google Calendar events 响应体（只取需要的字段）
#[derive(Deserialize)]
struct EventsResponse {
    #[serde(default)]
    items: Vec<RawEvent>,
}

#[derive(Deserialize, Default)]
struct RawEvent {
    summary: Option<String>,
    location: Option<String>,
    start: Option<EventTime>,
    end: Option<EventTime>,
    #[serde(rename = "hangoutLink")]
    hangout_link: Option<String>,
    #[serde(rename = "htmlLink")]
    html_link: Option<String>,
    #[serde(rename = "conferenceData")]
    conference_data: Option<ConferenceData>,
}

#[derive(Deserialize, Default)]
struct EventTime {
    #[serde(rename = "dateTime")]
    date_time: Option<String>,
    date: Option<String>,
}

#[derive(Deserialize)]
struct ConferenceData {
    #[serde(rename = "entryPoints", default)]
    entry_points: Vec<EntryPoint>,
}

#[derive(Deserialize)]
struct EntryPoint {
    #[serde(rename = "entryPointType")]
    entry_point_type: Option<String>,
    uri: Option<String>,
}

pub struct GoogleCalendar {
    client: Client,
    config: CalendarConfig,
}

impl GoogleCalendar {
    pub fn new(config: CalendarConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// 读取当天（本地时区）所有单次展开后的事件，按开始时间排序
    pub async fn list_today(&self) -> Result<Vec<Event>> {
        let now = chrono::Local::now();
        let today = now.date_naive();
        let tomorrow = today.succ_opt().unwrap_or(today);
        let offset = now.offset().to_string();
        let time_min = format!("{}T00:00:00{}", today, offset);
        let time_max = format!("{}T00:00:00{}", tomorrow, offset);

        let url = format!(
            "{}/calendars/{}/events",
            self.config.api_url, self.config.calendar_id
        );

        info!("读取日程: {} ({} ~ {})", url, time_min, time_max);

        let response = self
            .client
            .get(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.access_token),
            )
            .query(&[
                ("timeMin", time_min.as_str()),
                ("timeMax", time_max.as_str()),
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
            ])
            .send()
            .await
            .context("日程请求失败")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("日程 API 返回错误 {}: {}", status, body);
        }

        let events: EventsResponse = response.json().await.context("解析日程响应失败")?;
        info!("今日事件数: {}", events.items.len());

        Ok(events.items.into_iter().map(convert).collect())
    }
}

fn convert(raw: RawEvent) -> Event {
    // 会议链接优先级: hangoutLink -> conferenceData 的 video/more 入口 -> 事件网页
    let mut link = raw.hangout_link.unwrap_or_default();
    if link.is_empty() {
        if let Some(conf) = raw.conference_data {
            for ep in conf.entry_points {
                let kind = ep.entry_point_type.as_deref().unwrap_or("");
                if (kind == "video" || kind == "more") && ep.uri.is_some() {
                    link = ep.uri.unwrap_or_default();
                    break;
                }
            }
        }
    }
    if link.is_empty() {
        link = raw.html_link.unwrap_or_default();
    }

    Event {
        title: raw.summary.unwrap_or_else(|| "(No title)".to_string()),
        start: fmt_time(raw.start.as_ref()),
        end: fmt_time(raw.end.as_ref()),
        location: raw.location.unwrap_or_default(),
        link,
    }
}

/// "dateTime" 取 hh:mm，只有 "date" 的全天事件显示 All-day
fn fmt_time(t: Option<&EventTime>) -> String {
    let Some(t) = t else {
        return "N/A".to_string();
    };

    if let Some(ref dt) = t.date_time {
        let dt = dt.replace('T', " ").replace('Z', "");
        if let Some(time_part) = dt.split(' ').nth(1) {
            return time_part.chars().take(5).collect();
        }
        return dt;
    }
    if t.date.is_some() {
        return "All-day".to_string();
    }
    "N/A".to_string()
}

/// 事件列表转 Markdown 表格
pub fn events_to_markdown(events: &[Event]) -> String {
    if events.is_empty() {
        return "_(No events today)_\n".to_string();
    }

    let esc = |s: &str| s.replace('|', "\\|");

    let mut md = String::new();
    md.push_str("| Time | Title | Location | Link |\n");
    md.push_str("|---|---|---|---|\n");
    for ev in events {
        let time_range = if ev.start == ev.end {
            ev.start.clone()
        } else {
            format!("{} - {}", ev.start, ev.end)
        };
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            esc(&time_range),
            esc(&ev.title),
            esc(&ev.location),
            esc(&ev.link)
        ));
    }
    md
}

/// 事件列表转 HTML 日程卡片（邮件正文用）
pub fn events_to_html(events: &[Event]) -> String {
    if events.is_empty() {
        return r#"<div style="font-family: sans-serif; font-size:14px; color:#555;">(No events today)</div>"#
            .to_string();
    }

    let mut rows = String::new();
    for ev in events {
        let time_range = if ev.start == ev.end {
            ev.start.clone()
        } else {
            format!("{} - {}", ev.start, ev.end)
        };
        let link_html = if ev.link.is_empty() {
            String::new()
        } else {
            format!(r#"<a href="{}" target="_blank">Link</a>"#, html_escape(&ev.link))
        };
        rows.push_str(&format!(
            r#"<tr>
  <td style="padding:10px 14px; border-top:1px solid #e5e7eb; font-size:14px; width:140px;">{}</td>
  <td style="padding:10px 14px; border-top:1px solid #e5e7eb; font-size:14px;">{}</td>
  <td style="padding:10px 14px; border-top:1px solid #e5e7eb; font-size:14px; color:#374151;">{}</td>
  <td style="padding:10px 14px; border-top:1px solid #e5e7eb; font-size:14px;">{}</td>
</tr>
"#,
            html_escape(&time_range),
            html_escape(&ev.title),
            html_escape(&ev.location),
            link_html
        ));
    }

    format!(
        r#"<div style="font-family: -apple-system, 'Segoe UI', Roboto, 'Noto Sans SC', sans-serif; background:#fff; border:1px solid #e5e7eb; border-radius:12px; overflow:hidden; max-width:720px; margin:20px auto;">
  <div style="padding:16px; font-size:18px; font-weight:600; border-bottom:1px solid #e5e7eb;">今日行程</div>
  <table role="presentation" cellspacing="0" cellpadding="0" style="width:100%; border-collapse:collapse;">
    <thead>
      <tr style="background:#f9fafb;">
        <th align="left" style="padding:10px 14px; font-size:12px; color:#374151;">时间</th>
        <th align="left" style="padding:10px 14px; font-size:12px; color:#374151;">事项</th>
        <th align="left" style="padding:10px 14px; font-size:12px; color:#374151;">地点</th>
        <th align="left" style="padding:10px 14px; font-size:12px; color:#374151;">链接</th>
      </tr>
    </thead>
    <tbody>
{}    </tbody>
  </table>
</div>
"#,
        rows
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timed(dt: &str) -> Option<EventTime> {
        Some(EventTime {
            date_time: Some(dt.to_string()),
            date: None,
        })
    }

    #[test]
    fn datetime_formats_to_hhmm() {
        assert_eq!(fmt_time(timed("2026-08-28T09:30:00+01:00").as_ref()), "09:30");
        assert_eq!(fmt_time(timed("2026-08-28T23:05:00Z").as_ref()), "23:05");
    }

    #[test]
    fn all_day_event_shows_label() {
        let t = EventTime {
            date_time: None,
            date: Some("2026-08-28".to_string()),
        };
        assert_eq!(fmt_time(Some(&t)), "All-day");
        assert_eq!(fmt_time(None), "N/A");
    }

    #[test]
    fn link_preference_order() {
        let raw = RawEvent {
            summary: Some("standup".to_string()),
            hangout_link: Some("https://meet.example/h".to_string()),
            html_link: Some("https://cal.example/e".to_string()),
            ..Default::default()
        };
        assert_eq!(convert(raw).link, "https://meet.example/h");

        let raw = RawEvent {
            conference_data: Some(ConferenceData {
                entry_points: vec![
                    EntryPoint {
                        entry_point_type: Some("phone".to_string()),
                        uri: Some("tel:123".to_string()),
                    },
                    EntryPoint {
                        entry_point_type: Some("video".to_string()),
                        uri: Some("https://meet.example/v".to_string()),
                    },
                ],
            }),
            html_link: Some("https://cal.example/e".to_string()),
            ..Default::default()
        };
        assert_eq!(convert(raw).link, "https://meet.example/v");

        let raw = RawEvent {
            html_link: Some("https://cal.example/e".to_string()),
            ..Default::default()
        };
        assert_eq!(convert(raw).link, "https://cal.example/e");
    }

    #[test]
    fn empty_day_renders_placeholder() {
        assert_eq!(events_to_markdown(&[]), "_(No events today)_\n");
        assert!(events_to_html(&[]).contains("(No events today)"));
    }

    #[test]
    fn markdown_table_escapes_pipes() {
        let ev = Event {
            title: "a|b".to_string(),
            start: "09:00".to_string(),
            end: "10:00".to_string(),
            location: String::new(),
            link: String::new(),
        };
        let md = events_to_markdown(&[ev]);
        assert!(md.contains("a\\|b"));
        assert!(md.contains("09:00 - 10:00"));
    }
}
