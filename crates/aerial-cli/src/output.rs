//! Output formatting for the demo driver

use aerial_core::{AdOverlayView, PlayerNotification};
use console::style;

/// Output format options
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

/// Render one service notification
pub fn render_notification(notification: &PlayerNotification, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return serde_json::to_string(notification).unwrap_or_else(|_| "{}".to_string());
    }

    match notification {
        PlayerNotification::StateChanged { state } => {
            format!("{} {}", style("state").cyan(), style(state).bold())
        }
        PlayerNotification::TimeChanged { position } => {
            format!("{} {} ms", style("time").dim(), position.as_millis())
        }
        PlayerNotification::PlaybackEnded => style("playback ended").magenta().to_string(),
        PlayerNotification::SourceChanged { source } => format!(
            "{} {} ({} on {})",
            style("source").green(),
            source.uri(),
            source.program(),
            source.channel_id(),
        ),
        PlayerNotification::Error { reason } => {
            format!("{} {}", style("error").red().bold(), reason)
        }
    }
}

/// Render the ad overlay the way the reference player displays it
pub fn render_overlay(view: &AdOverlayView) -> Vec<String> {
    let mut lines = Vec::new();

    match &view.ordinal {
        Some(ordinal) => lines.push(format!("AD {ordinal}")),
        None => lines.push("AD".to_string()),
    }
    lines.push(format!("Will finish in {:.0} s", view.seconds_to_end));
    lines.push(format!("Is skippable: {}", view.is_skippable));

    if let Some(skip) = &view.skip {
        if let Some(seconds) = skip.seconds_to_skippable {
            lines.push(format!("Can be skipped in {seconds:.0} s"));
        }
        lines.push(format!("Can skip: {}", skip.enabled));
        let button = if skip.enabled {
            style("[ Skip ad ]").green().bold().to_string()
        } else {
            style("[ Skip ad ]").dim().to_string()
        };
        lines.push(button);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerial_core::{AdFeed, AdOverlay, AdState};
    use url::Url;

    #[test]
    fn test_overlay_lines_without_skip() {
        let (feed, _rx) = AdFeed::new();
        feed.publish(Some(AdState::new(
            Url::parse("https://ads.example.com/a.mp4").unwrap(),
            12.0,
        )));
        let ad = feed.subscribe().borrow().clone().unwrap();
        let view = AdOverlay::project(Some(&ad)).unwrap();

        let lines = render_overlay(&view);
        assert_eq!(lines[0], "AD");
        assert!(lines.iter().all(|line| !line.contains("Skip ad")));
    }

    #[test]
    fn test_json_format_is_machine_readable() {
        let rendered = render_notification(&PlayerNotification::PlaybackEnded, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["notification"], "playback_ended");
    }
}
