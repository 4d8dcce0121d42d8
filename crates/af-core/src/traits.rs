use std::marker::PhantomData;
use std::time::{Duration, Instant};

use flume::{Receiver, RecvTimeoutError};

use crate::cancel::CancelToken;
use crate::error::CoreError;
use crate::frame::FrameBuffer;

/// Granularité de l'attente annulable.
const CANCEL_POLL: Duration = Duration::from_millis(50);

/// Source vidéo pilotable par position temporelle.
///
/// Implémenté par : `FfmpegVideo` (af-source, feature `video`) et les sources
/// factices des tests.
///
/// # Example
/// ```
/// use af_core::frame::FrameBuffer;
/// use af_core::traits::{PendingFrame, VideoSource};
///
/// struct Still;
/// impl VideoSource for Still {
///     fn duration(&self) -> f64 { 1.0 }
///     fn native_size(&self) -> (u32, u32) { (4, 4) }
///     fn seek(&mut self, at: f64) -> PendingFrame<'_> {
///         PendingFrame::ready(at, Ok(FrameBuffer::new(4, 4)))
///     }
/// }
///
/// let mut video = Still;
/// let frame = video.seek(0.5).wait(None).unwrap();
/// assert_eq!(frame.width, 4);
/// ```
pub trait VideoSource {
    /// Durée totale en secondes.
    fn duration(&self) -> f64;

    /// Dimensions natives des frames (avant resize).
    fn native_size(&self) -> (u32, u32);

    /// Positionne la lecture à `at` secondes et capture la frame visible.
    ///
    /// Le [`PendingFrame`] retourné emprunte la source : un seul seek peut
    /// être en vol à la fois.
    fn seek(&mut self, at: f64) -> PendingFrame<'_>;

    /// Seek + attente annulable + contrôle des dimensions natives.
    ///
    /// # Errors
    /// [`CoreError::Cancelled`] si `cancel` est déclenché pendant l'attente,
    /// [`CoreError::Seek`] sur timeout, fermeture de la source ou frame dont
    /// la taille diffère de [`VideoSource::native_size`].
    fn capture(
        &mut self,
        at: f64,
        timeout: Option<Duration>,
        cancel: Option<&CancelToken>,
    ) -> Result<FrameBuffer, CoreError> {
        let (width, height) = self.native_size();
        let frame = self.seek(at).wait_cancellable(timeout, cancel)?;
        if (frame.width, frame.height) != (width, height) {
            return Err(CoreError::seek(
                at,
                format!(
                    "frame {}×{} au lieu de {width}×{height}",
                    frame.width, frame.height
                ),
            ));
        }
        Ok(frame)
    }
}

/// Résultat unique d'un seek en cours.
///
/// Se résout exactement une fois, via [`PendingFrame::wait`].
#[must_use = "un seek non attendu ne produit aucune frame"]
pub struct PendingFrame<'a> {
    at: f64,
    rx: Receiver<Result<FrameBuffer, CoreError>>,
    _source: PhantomData<&'a mut ()>,
}

impl PendingFrame<'_> {
    /// Wrap the reply channel of an in-flight seek.
    pub fn new(at: f64, rx: Receiver<Result<FrameBuffer, CoreError>>) -> Self {
        Self {
            at,
            rx,
            _source: PhantomData,
        }
    }

    /// Seek déjà résolu (sources synchrones, erreurs immédiates).
    pub fn ready(at: f64, result: Result<FrameBuffer, CoreError>) -> Self {
        let (tx, rx) = flume::bounded(1);
        // Le canal est neuf et de capacité 1 : l'envoi ne peut pas échouer.
        let _ = tx.send(result);
        Self::new(at, rx)
    }

    /// Attend la fin du seek. `None` = attente non bornée.
    ///
    /// # Errors
    /// Returns [`CoreError::Seek`] if the timeout elapses or the source hangs
    /// up, or the error reported by the source itself.
    pub fn wait(self, timeout: Option<Duration>) -> Result<FrameBuffer, CoreError> {
        let at = self.at;
        match timeout {
            Some(limit) => self.rx.recv_timeout(limit).map_err(|e| match e {
                RecvTimeoutError::Timeout => timed_out(at, limit),
                RecvTimeoutError::Disconnected => hung_up(at),
            })?,
            None => self.rx.recv().map_err(|_| hung_up(at))?,
        }
    }

    /// Comme [`PendingFrame::wait`], en consultant `cancel` toutes les 50 ms.
    ///
    /// # Errors
    /// Returns [`CoreError::Cancelled`] once `cancel` is set, otherwise the
    /// same errors as [`PendingFrame::wait`].
    pub fn wait_cancellable(
        self,
        timeout: Option<Duration>,
        cancel: Option<&CancelToken>,
    ) -> Result<FrameBuffer, CoreError> {
        let Some(cancel) = cancel else {
            return self.wait(timeout);
        };
        let at = self.at;
        let deadline = timeout.map(|limit| (Instant::now() + limit, limit));

        loop {
            cancel.check()?;
            let slice = match deadline {
                Some((end, limit)) => {
                    let left = end.saturating_duration_since(Instant::now());
                    if left.is_zero() {
                        return Err(timed_out(at, limit));
                    }
                    left.min(CANCEL_POLL)
                }
                None => CANCEL_POLL,
            };
            match self.rx.recv_timeout(slice) {
                Ok(result) => return result,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return Err(hung_up(at)),
            }
        }
    }
}

fn timed_out(at: f64, limit: Duration) -> CoreError {
    CoreError::seek(
        at,
        format!("position non atteinte après {} ms", limit.as_millis()),
    )
}

fn hung_up(at: f64) -> CoreError {
    CoreError::seek(at, "source vidéo fermée")
}
