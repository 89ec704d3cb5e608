use std::collections::{HashMap, HashSet, VecDeque};

use super::validate::RegistryIssue;
use crate::tutorial::TutorialInfo;

/// Topological sort of tutorials by prerequisite order (Kahn's algorithm).
/// Returns slugs so that every tutorial comes after its prerequisites.
///
/// Prerequisites that name no tutorial in the list are ignored here; they
/// are reported separately by validation.
pub fn topo_order(tutorials: &[TutorialInfo]) -> Result<Vec<String>, RegistryIssue> {
    let known: HashSet<&str> = tutorials.iter().map(|t| t.slug.as_str()).collect();
    let mut in_degree: HashMap<&str, usize> = HashMap::new();
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();

    for t in tutorials {
        in_degree.entry(&t.slug).or_insert(0);
        dependents.entry(&t.slug).or_default();
    }

    // Edges run prerequisite -> dependent. Duplicate declarations count once.
    for t in tutorials {
        let mut seen = HashSet::new();
        for prereq in &t.prerequisites {
            if !known.contains(prereq.as_str()) || !seen.insert(prereq.as_str()) {
                continue;
            }
            *in_degree.entry(&t.slug).or_insert(0) += 1;
            dependents.entry(prereq.as_str()).or_default().push(&t.slug);
        }
    }

    let mut ready: Vec<&str> = in_degree
        .iter()
        .filter(|(_, &deg)| deg == 0)
        .map(|(&slug, _)| slug)
        .collect();
    // Sorted for deterministic output
    ready.sort();
    let mut queue: VecDeque<&str> = ready.into();

    let mut order = Vec::with_capacity(in_degree.len());
    while let Some(slug) = queue.pop_front() {
        order.push(slug.to_string());
        let Some(deps) = dependents.get(slug) else {
            continue;
        };
        let mut next = Vec::new();
        for &dep in deps {
            if let Some(deg) = in_degree.get_mut(dep) {
                *deg -= 1;
                if *deg == 0 {
                    next.push(dep);
                }
            }
        }
        next.sort();
        queue.extend(next);
    }

    if order.len() != in_degree.len() {
        let placed: HashSet<&str> = order.iter().map(|s| s.as_str()).collect();
        let mut members: Vec<String> = in_degree
            .keys()
            .filter(|slug| !placed.contains(*slug))
            .map(|slug| slug.to_string())
            .collect();
        members.sort();
        return Err(RegistryIssue::Cycle { members });
    }

    Ok(order)
}
