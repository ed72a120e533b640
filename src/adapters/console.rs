use crate::domain::model::{AngleVector, PostureMatch};
use crate::domain::ports::Presenter;
use crate::utils::error::Result;
use std::io::{Stdout, Write};

/// Text stand-in for the video overlay: one line per recognised posture.
pub struct ConsolePresenter<W: Write> {
    out: W,
    last_shown: Option<String>,
    repeat: bool,
}

impl ConsolePresenter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_shown: None,
            repeat: true,
        }
    }

    /// Only print a match when the posture name changes from the previous
    /// printed one.
    pub fn changes_only(mut self) -> Self {
        self.repeat = false;
        self
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn show_match(&mut self, frame_index: u64, result: &PostureMatch) -> Result<()> {
        if !self.repeat && self.last_shown.as_deref() == Some(result.name.as_str()) {
            return Ok(());
        }
        writeln!(self.out, "[frame {}] {}", frame_index, result)?;
        self.last_shown = Some(result.name.clone());
        Ok(())
    }

    fn prompt_for_name(&mut self, angles: &AngleVector) -> Result<()> {
        writeln!(self.out, "\nDetected angles (radians): {}", angles)?;
        write!(self.out, "Enter name for this posture: ")?;
        self.out.flush()?;
        Ok(())
    }

    fn confirm_registration(&mut self, name: &str, registered: &[String]) -> Result<()> {
        writeln!(self.out, "✅ Registered posture '{}' and saved.", name)?;
        writeln!(self.out, "Current postures: {}", registered.join(", "))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(presenter: ConsolePresenter<Vec<u8>>) -> String {
        String::from_utf8(presenter.into_inner()).unwrap()
    }

    #[test]
    fn test_show_match_formats_distance() {
        let mut presenter = ConsolePresenter::new(Vec::new());
        presenter
            .show_match(
                7,
                &PostureMatch {
                    name: "fist".to_string(),
                    distance: 0.12345,
                },
            )
            .unwrap();
        assert_eq!(output(presenter), "[frame 7] fist (0.123)\n");
    }

    #[test]
    fn test_changes_only_suppresses_repeats() {
        let mut presenter = ConsolePresenter::new(Vec::new()).changes_only();
        let fist = PostureMatch {
            name: "fist".to_string(),
            distance: 0.1,
        };
        let open = PostureMatch {
            name: "open".to_string(),
            distance: 0.2,
        };
        presenter.show_match(1, &fist).unwrap();
        presenter.show_match(2, &fist).unwrap();
        presenter.show_match(3, &open).unwrap();

        let text = output(presenter);
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("[frame 3] open (0.200)"));
    }

    #[test]
    fn test_prompt_and_confirmation() {
        let mut presenter = ConsolePresenter::new(Vec::new());
        presenter
            .prompt_for_name(&AngleVector::new([0.1, 0.25, 0.5, 1.0, 3.14159]))
            .unwrap();
        presenter
            .confirm_registration("fist", &["fist".to_string(), "open".to_string()])
            .unwrap();

        let text = output(presenter);
        assert!(text.contains("Detected angles (radians): [0.100, 0.250, 0.500, 1.000, 3.142]"));
        assert!(text.contains("Enter name for this posture: "));
        assert!(text.contains("Current postures: fist, open"));
    }
}
