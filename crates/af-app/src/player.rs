use std::io::{Write, stdout};
use std::time::{Duration, Instant};

use af_core::cancel::CancelToken;
use af_export::codegen::frame_interval_ms;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{cursor, queue, style, terminal};

/// Lecture en boucle d'une séquence : index courant, période, libellé.
#[derive(Debug)]
pub struct FramePlayer<'a> {
    frames: &'a [String],
    index: usize,
    interval: Duration,
}

impl<'a> FramePlayer<'a> {
    /// Période = `round(1000 / fps)` ms, comme le composant animé exporté.
    #[must_use]
    pub fn new(frames: &'a [String], fps: f64) -> Self {
        Self {
            frames,
            index: 0,
            interval: Duration::from_millis(frame_interval_ms(fps)),
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&'a str> {
        self.frames.get(self.index).map(String::as_str)
    }

    /// Avance d'une frame, retour à 0 après la dernière.
    pub fn tick(&mut self) {
        if !self.frames.is_empty() {
            self.index = (self.index + 1) % self.frames.len();
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// "Frame i of N", 1-indexé.
    #[must_use]
    pub fn label(&self) -> String {
        format!("Frame {} of {}", self.index + 1, self.frames.len())
    }
}

/// Joue `frames` dans le terminal jusqu'à `q`, Échap, Ctrl-C ou annulation.
///
/// # Errors
/// Returns an error if the terminal cannot be configured or written.
pub fn play(frames: &[String], fps: f64, cancel: &CancelToken) -> Result<()> {
    if frames.is_empty() {
        log::warn!("Aucune frame à jouer.");
        return Ok(());
    }

    let mut player = FramePlayer::new(frames, fps);
    terminal::enable_raw_mode()?;

    let result = with_restore(
        || {
            crossterm::execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
            Ok(())
        },
        || play_loop(&mut player, cancel),
        // Restaurer le terminal (TOUJOURS, même en cas d'erreur)
        || {
            crossterm::execute!(stdout(), cursor::Show, terminal::LeaveAlternateScreen).ok();
            terminal::disable_raw_mode().ok();
        },
    );
    log::info!("Lecture arrêtée à la frame {}/{}", player.index() + 1, frames.len());
    result
}

/// `enter` puis `body`, et `restore` dans tous les cas, y compris si `enter`
/// échoue à mi-chemin.
fn with_restore<T>(
    enter: impl FnOnce() -> Result<()>,
    body: impl FnOnce() -> Result<T>,
    restore: impl FnOnce(),
) -> Result<T> {
    let result = enter().and_then(|()| body());
    restore();
    result
}

fn play_loop(player: &mut FramePlayer<'_>, cancel: &CancelToken) -> Result<()> {
    let mut out = stdout();
    let mut next_tick = Instant::now();

    while !cancel.is_cancelled() {
        let now = Instant::now();
        if now >= next_tick {
            draw(&mut out, player)?;
            player.tick();
            next_tick = now + player.interval();
        }

        if event::poll(next_tick.saturating_duration_since(Instant::now()))?
            && let Event::Key(key) = event::read()?
            && is_quit(&key)
        {
            break;
        }
    }
    Ok(())
}

fn draw(out: &mut impl Write, player: &FramePlayer<'_>) -> Result<()> {
    queue!(
        out,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0),
        style::Print(player.label())
    )?;
    if let Some(frame) = player.current() {
        for (row, line) in frame.lines().enumerate() {
            let y = u16::try_from(row + 1).unwrap_or(u16::MAX);
            queue!(out, cursor::MoveTo(0, y), style::Print(line))?;
        }
    }
    out.flush()?;
    Ok(())
}

/// En raw mode, Ctrl-C arrive comme un événement clavier.
fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("frame{i}")).collect()
    }

    #[test]
    fn tick_wraps_to_zero() {
        let seq = frames(3);
        let mut player = FramePlayer::new(&seq, 10.0);
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(player.current().unwrap().to_string());
            player.tick();
        }
        assert_eq!(seen, vec!["frame0", "frame1", "frame2", "frame0"]);
    }

    #[test]
    fn label_is_one_indexed() {
        let seq = frames(5);
        let mut player = FramePlayer::new(&seq, 1.0);
        assert_eq!(player.label(), "Frame 1 of 5");
        player.tick();
        player.tick();
        assert_eq!(player.label(), "Frame 3 of 5");
    }

    #[test]
    fn interval_follows_fps() {
        let seq = frames(1);
        assert_eq!(FramePlayer::new(&seq, 5.0).interval(), Duration::from_millis(200));
        assert_eq!(FramePlayer::new(&seq, 0.0).interval(), Duration::from_secs(1));
    }

    #[test]
    fn empty_sequence_is_inert() {
        let seq: Vec<String> = Vec::new();
        let mut player = FramePlayer::new(&seq, 2.0);
        player.tick();
        assert_eq!(player.index(), 0);
        assert!(player.current().is_none());
    }

    #[test]
    fn draw_writes_label_and_rows() {
        let seq = vec!["@@\n  ".to_string()];
        let player = FramePlayer::new(&seq, 1.0);
        let mut buf = Vec::new();
        draw(&mut buf, &player).unwrap();
        let text = String::from_utf8_lossy(&buf);
        assert!(text.contains("Frame 1 of 1"));
        assert!(text.contains("@@"));
    }

    #[test]
    fn quit_keys() {
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert!(is_quit(&q));
        assert!(is_quit(&ctrl_c));
        assert!(!is_quit(&c));
    }

    #[test]
    fn empty_sequence_returns_immediately() {
        assert!(play(&[], 1.0, &CancelToken::new()).is_ok());
    }

    #[test]
    fn restore_runs_when_enter_fails() {
        let mut restored = false;
        let mut body_ran = false;
        let result: Result<()> = with_restore(
            || Err(anyhow::anyhow!("alternate screen refusé")),
            || {
                body_ran = true;
                Ok(())
            },
            || restored = true,
        );
        assert!(result.is_err());
        assert!(restored);
        assert!(!body_ran);
    }

    #[test]
    fn restore_runs_after_body_error() {
        let mut restored = false;
        let result: Result<u8> = with_restore(
            || Ok(()),
            || Err(anyhow::anyhow!("écriture impossible")),
            || restored = true,
        );
        assert!(result.is_err());
        assert!(restored);
    }

    #[test]
    fn body_value_is_returned() {
        let mut restored = false;
        let result = with_restore(|| Ok(()), || Ok(7), || restored = true).unwrap();
        assert_eq!(result, 7);
        assert!(restored);
    }
}
