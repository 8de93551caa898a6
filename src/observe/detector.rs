/// Outcome of comparing a fresh sample with the committed one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Commit,
    Skip,
}

/// Decides whether a newly sampled value is worth committing.
///
/// Compares canonical values, never their encoded payload: an unchanged
/// reading produces no commit, no timestamp update and no notification.
pub fn decide<T: PartialEq + ?Sized>(
    old: &T,
    new: &T,
) -> Decision {
    if old == new {
        Decision::Skip
    } else {
        Decision::Commit
    }
}
