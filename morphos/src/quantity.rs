//! Derived quantities and their dependency graph.
//!
//! Every quantity an [`ObjectCache`](crate::ObjectCache) can memoize is a
//! [`Quantity`]. Dependencies are declared statically and checked to form a
//! DAG when the builtin feature registry is built, so lazy evaluation through
//! the cache can never recurse forever.

use std::hash::Hash;

use hashbrown::HashMap;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumCount, EnumIter};
use thiserror::Error;

#[derive(Debug, Display, EnumIter, EnumCount, Copy, Clone, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum Quantity {
    Crop,
    Mask,
    Masked,
    Coordinates,
    Centroid,
    Area,
    EulerNumber,
    SpatialMoments,
    LocalCentroid,
    CentralMoments,
    InertiaTensor,
    InertiaTensorEigenvalues,
    ConvexHull,
    Edge,
    MaximumIntensity,
}

impl Quantity {
    /// Quantities that must exist before this one can be computed.
    ///
    /// Inputs read directly from the images or the object slice are not listed.
    pub const fn dependencies(self) -> &'static [Quantity] {
        use Quantity::*;
        match self {
            Crop | Mask | Area | EulerNumber => &[],
            Masked => &[Crop, Mask],
            Coordinates => &[Crop],
            Centroid => &[Coordinates],
            SpatialMoments => &[Masked],
            LocalCentroid => &[SpatialMoments],
            CentralMoments => &[LocalCentroid, Mask],
            InertiaTensor => &[CentralMoments],
            InertiaTensorEigenvalues => &[InertiaTensor],
            ConvexHull => &[Mask],
            Edge => &[Crop, Mask],
            MaximumIntensity => &[Masked],
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Cycle detected in dependency graph at {node}")]
pub struct CycleDetected<N: std::fmt::Display + std::fmt::Debug> {
    pub node: N,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Visiting,
    Resolved,
}

enum Visit<N> {
    Enter(N),
    Done(N),
}

/// Orders `roots` and everything they depend on so that every node comes after
/// its dependencies. Fails on the first node found on a cycle.
pub fn dependency_order<N, F>(
    roots: impl IntoIterator<Item = N>,
    dependencies: F,
) -> Result<Vec<N>, CycleDetected<N>>
where
    N: Copy + Eq + Hash + std::fmt::Display + std::fmt::Debug,
    F: Fn(N) -> Vec<N>,
{
    let mut states: HashMap<N, VisitState> = HashMap::new();
    let mut order = Vec::new();
    let mut stack: Vec<Visit<N>> = roots.into_iter().map(Visit::Enter).collect();
    stack.reverse();

    while let Some(visit) = stack.pop() {
        let node = match visit {
            Visit::Done(node) => {
                states.insert(node, VisitState::Resolved);
                order.push(node);
                continue;
            }
            Visit::Enter(node) => node,
        };

        match states.get(&node) {
            Some(VisitState::Resolved) => continue,
            Some(VisitState::Visiting) => return Err(CycleDetected { node }),
            None => {}
        }

        states.insert(node, VisitState::Visiting);
        stack.push(Visit::Done(node));
        for dependency in dependencies(node).into_iter().rev() {
            stack.push(Visit::Enter(dependency));
        }
    }

    Ok(order)
}

/// Every quantity, dependencies first.
pub fn evaluation_order() -> Result<Vec<Quantity>, CycleDetected<Quantity>> {
    dependency_order(Quantity::iter(), |quantity| quantity.dependencies().to_vec())
}
