//! Optional collaborators modelled as an explicit capability.

/// A collaborator that is either wired up or knowingly absent.
pub enum Collaborator<T: ?Sized> {
    Available(Box<T>),
    Unavailable { reason: String },
}

impl<T: ?Sized> Collaborator<T> {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// The collaborator, or the reason it is not configured.
    pub fn get(&self) -> Result<&T, &str> {
        match self {
            Self::Available(inner) => Ok(inner.as_ref()),
            Self::Unavailable { reason } => Err(reason.as_str()),
        }
    }
}

impl<T: ?Sized> std::fmt::Debug for Collaborator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(_) => f.write_str("Available"),
            Self::Unavailable { reason } => write!(f, "Unavailable({reason})"),
        }
    }
}
