/// Glob-style pattern over request targets. `*` matches any run of
/// characters, everything else matches itself. Matching is anchored at both
/// ends and ignores case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    // Literal pieces between wildcards, lower-cased. A pattern without
    // wildcards has exactly one piece.
    pieces: Vec<String>,
}

impl Pattern {
    pub fn new(pattern: &str) -> Self {
        Pattern {
            pieces: pattern.to_lowercase().split('*').map(str::to_owned).collect(),
        }
    }

    pub fn matches(&self, target: &str) -> bool {
        let target = target.to_lowercase();

        let (first, rest) = match self.pieces.split_first() {
            Some(split) => split,
            None => return target.is_empty(),
        };
        let Some((last, middle)) = rest.split_last() else {
            return target == *first;
        };

        if target.len() < first.len() + last.len()
            || !target.starts_with(first.as_str())
            || !target.ends_with(last.as_str())
        {
            return false;
        }

        let mut remaining = &target[first.len()..target.len() - last.len()];
        for piece in middle {
            match remaining.find(piece.as_str()) {
                Some(idx) => remaining = &remaining[idx + piece.len()..],
                None => return false,
            }
        }
        true
    }
}

impl From<&str> for Pattern {
    fn from(pattern: &str) -> Self {
        Pattern::new(pattern)
    }
}

/// Decides whether `target` should receive chaos treatment.
///
/// Exclude patterns win over include patterns. An empty include list puts
/// every target that is not excluded in scope.
pub fn in_scope<S: AsRef<str>>(target: &str, include: &[S], exclude: &[S]) -> bool {
    if exclude
        .iter()
        .any(|p| Pattern::new(p.as_ref()).matches(target))
    {
        return false;
    }

    include.is_empty()
        || include
            .iter()
            .any(|p| Pattern::new(p.as_ref()).matches(target))
}

/// Pre-compiled include/exclude lists, same semantics as [`in_scope`].
#[derive(Debug, Clone, Default)]
pub struct TargetFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl TargetFilter {
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Self {
        TargetFilter {
            include: include.iter().map(|p| Pattern::new(p.as_ref())).collect(),
            exclude: exclude.iter().map(|p| Pattern::new(p.as_ref())).collect(),
        }
    }

    pub fn in_scope(&self, target: &str) -> bool {
        if self.exclude.iter().any(|p| p.matches(target)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|p| p.matches(target))
    }
}
