//! Prerequisite-chain resolution.
//!
//! The graph is the [`TutorialMap`]: each tutorial lists the slugs it directly
//! depends on. Every function here is pure. Traversal state lives on the call
//! stack of a single query, so results depend only on the arguments.
//!
//! Appendix tutorials are skipped whenever they are reached *as a
//! prerequisite*. Unknown slugs are skipped silently.
//!
//! Prerequisite graphs are validated as acyclic when the registry is loaded,
//! but the recursive walks below still carry the current recursion path and
//! treat a slug that is already on it as a back-edge to skip. On acyclic input
//! this never triggers, diamonds included.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::progress::Progress;
use crate::tutorial::{TutorialInfo, TutorialMap};

/// Everything still blocking a tutorial: one prominent next step plus the rest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncompletePrerequisites {
    /// The deepest incomplete prerequisite, as returned by
    /// [`find_nearest_incomplete_prerequisite`].
    pub primary: TutorialInfo,
    /// Every other incomplete prerequisite in the closure, in visit order.
    pub others: Vec<TutorialInfo>,
}

// ── Chain completion ──

/// Is `slug` complete, and is every tutorial it transitively depends on?
///
/// Unknown slugs are vacuously complete. Appendices are not special-cased:
/// asking about an appendix directly checks its own record.
pub fn is_tutorial_chain_complete<P>(slug: &str, map: &TutorialMap, progress: &P) -> bool
where
    P: Progress + ?Sized,
{
    let mut path = HashSet::new();
    chain_complete(slug, map, progress, &mut path)
}

fn chain_complete<'a, P>(
    slug: &str,
    map: &'a TutorialMap,
    progress: &P,
    path: &mut HashSet<&'a str>,
) -> bool
where
    P: Progress + ?Sized,
{
    let Some((key, tutorial)) = map.get_key_value(slug) else {
        return true;
    };
    if path.contains(key.as_str()) {
        tracing::warn!(slug = %key, "prerequisite cycle, skipping back-edge");
        return true;
    }
    if !progress.is_completed(key) {
        return false;
    }

    path.insert(key.as_str());
    let complete = tutorial
        .prerequisites
        .iter()
        .all(|prereq| chain_complete(prereq, map, progress, path));
    path.remove(key.as_str());
    complete
}

// ── Nearest incomplete ──

/// Find the tutorial a user should go do next, given the direct
/// prerequisites of the tutorial they are looking at.
///
/// The answer is the *deepest* unmet dependency. For the chain
/// `A -> B -> C -> D` viewed from `D` with nothing done, that is `A`, not `C`.
///
/// Prerequisites are tried in declared order and the first one whose branch
/// contains anything incomplete wins. Inside a branch the walk always goes
/// upstream first: an incomplete node is only returned when none of its own
/// prerequisites are incomplete. A completed node is still descended into.
pub fn find_nearest_incomplete_prerequisite<'a, P>(
    prerequisites: &[String],
    map: &'a TutorialMap,
    progress: &P,
) -> Option<&'a TutorialInfo>
where
    P: Progress + ?Sized,
{
    let mut path = HashSet::new();
    nearest_incomplete(prerequisites, map, progress, &mut path)
}

fn nearest_incomplete<'a, P>(
    prerequisites: &[String],
    map: &'a TutorialMap,
    progress: &P,
    path: &mut HashSet<&'a str>,
) -> Option<&'a TutorialInfo>
where
    P: Progress + ?Sized,
{
    for slug in prerequisites {
        let Some((key, tutorial)) = map.get_key_value(slug.as_str()) else {
            continue;
        };
        if tutorial.is_appendix {
            continue;
        }
        if path.contains(key.as_str()) {
            tracing::warn!(slug = %key, "prerequisite cycle, skipping back-edge");
            continue;
        }

        path.insert(key.as_str());
        let deeper = nearest_incomplete(&tutorial.prerequisites, map, progress, path);
        path.remove(key.as_str());

        if !progress.is_completed(key) {
            return Some(deeper.unwrap_or(tutorial));
        }
        // Completed, but something upstream may have been skipped.
        if deeper.is_some() {
            return deeper;
        }
    }
    None
}

/// Should a prerequisite prompt be shown for a tutorial with these direct
/// prerequisites?
pub fn should_show_prerequisites<P>(
    prerequisites: Option<&[String]>,
    map: &TutorialMap,
    progress: &P,
) -> bool
where
    P: Progress + ?Sized,
{
    prerequisites.is_some_and(|prereqs| {
        find_nearest_incomplete_prerequisite(prereqs, map, progress).is_some()
    })
}

// ── All incomplete ──

/// Collect every incomplete tutorial in the transitive closure of
/// `prerequisites`, split into the primary next step and everything else.
///
/// Returns `None` when the input is absent or empty, or when nothing in the
/// closure is incomplete.
pub fn collect_all_incomplete_prerequisites<P>(
    prerequisites: Option<&[String]>,
    map: &TutorialMap,
    progress: &P,
) -> Option<IncompletePrerequisites>
where
    P: Progress + ?Sized,
{
    let prerequisites = prerequisites.filter(|p| !p.is_empty())?;

    let mut visited = HashSet::new();
    let mut incomplete = Vec::new();
    collect_incomplete(prerequisites, map, progress, &mut visited, &mut incomplete);

    if incomplete.is_empty() {
        return None;
    }

    let primary = find_nearest_incomplete_prerequisite(prerequisites, map, progress)?;
    let others = incomplete
        .into_iter()
        .filter(|t| t.slug != primary.slug)
        .cloned()
        .collect();

    Some(IncompletePrerequisites {
        primary: primary.clone(),
        others,
    })
}

/// Memoised DFS in declaration order. A slug is marked visited the first
/// time it is seen, before lookup, so shared dependencies are expanded once.
fn collect_incomplete<'a, P>(
    slugs: &'a [String],
    map: &'a TutorialMap,
    progress: &P,
    visited: &mut HashSet<&'a str>,
    out: &mut Vec<&'a TutorialInfo>,
) where
    P: Progress + ?Sized,
{
    for slug in slugs {
        if !visited.insert(slug.as_str()) {
            continue;
        }
        let Some(tutorial) = map.get(slug.as_str()) else {
            continue;
        };
        if tutorial.is_appendix {
            continue;
        }
        if !progress.is_completed(slug) {
            out.push(tutorial);
        }
        collect_incomplete(&tutorial.prerequisites, map, progress, visited, out);
    }
}
