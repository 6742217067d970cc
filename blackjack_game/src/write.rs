use crate::SessionSummary;
use std::io::Write;

fn format_summaries(summaries: &[SessionSummary]) -> impl Iterator<Item = String> + '_ {
    const WIDTH: usize = 80;
    summaries.iter().enumerate().map(|(i, summary)| {
        let seat = format!("seat #{}", i + 1);
        let header = format!("{:-^WIDTH$}\n", seat);
        format!("{}{}{}\n", header, summary, "-".repeat(WIDTH))
    })
}

/// A public function to write the session summary of every seat to a writer
pub fn write_summaries(summaries: &[SessionSummary], mut writer: impl Write) -> std::io::Result<()> {
    for summary_str in format_summaries(summaries) {
        writer.write_all(summary_str.as_bytes())?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackjack_lib::HandOutcome;

    #[test]
    fn writes_one_block_per_seat() {
        let mut ada = SessionSummary::new("Ada".to_string(), 100);
        ada.record(HandOutcome::Win, 10, 20, 110);
        let bob = SessionSummary::new("Bob".to_string(), 100);

        let mut out = Vec::new();
        write_summaries(&[ada, bob], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("seat #1"));
        assert!(text.contains("seat #2"));
        assert!(text.contains("player: Ada"));
        assert!(text.contains("player: Bob"));
        assert_eq!(text.lines().filter(|l| l.starts_with("hands won")).count(), 2);
    }
}
