use thiserror::Error;

/// Errors surfaced by the conversion pipeline.
///
/// Aucune erreur n'est récupérée silencieusement : chaque variante interrompt
/// la conversion en cours et remonte telle quelle à l'appelant.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Argument hors contrat (largeur nulle, fps non positif, rampe vide).
    #[error("Argument invalide : {0}")]
    InvalidArgument(String),

    /// Requested frame count exceeds the extraction ceiling.
    #[error(
        "Nombre de frames ({requested}) supérieur au maximum ({max}) : réduisez le fps ou raccourcissez la vidéo"
    )]
    CapacityExceeded {
        /// Frame count computed from duration × fps.
        requested: u64,
        /// Hard ceiling.
        max: usize,
    },

    /// A pixel buffer could not be read or a sampling surface acquired.
    #[error("Ressource indisponible : {0}")]
    ResourceUnavailable(String),

    /// L'image ou la vidéo n'a jamais été prête (décodage impossible).
    #[error("Échec de décodage : {0}")]
    Decode(String),

    /// A seek never completed or the video source failed.
    #[error("Échec du seek à {at:.3}s : {reason}")]
    Seek {
        /// Target timestamp in seconds.
        at: f64,
        /// Cause lisible.
        reason: String,
    },

    /// Extraction abandonnée par l'appelant.
    #[error("Conversion annulée")]
    Cancelled,
}

impl CoreError {
    /// Raccourci pour construire une [`CoreError::Seek`].
    pub fn seek(at: f64, reason: impl Into<String>) -> Self {
        Self::Seek {
            at,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_message_cites_both_counts() {
        let msg = CoreError::CapacityExceeded {
            requested: 300,
            max: 200,
        }
        .to_string();
        assert!(msg.contains("(300)"), "{msg}");
        assert!(msg.contains("maximum (200)"), "{msg}");
    }

    #[test]
    fn seek_message_has_timestamp() {
        let msg = CoreError::seek(1.5, "timeout").to_string();
        assert!(msg.contains("1.500s"), "{msg}");
        assert!(msg.contains("timeout"), "{msg}");
    }
}
