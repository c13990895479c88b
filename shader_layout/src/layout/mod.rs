//! packing of composites into byte exact memory layouts

use std::collections::{HashMap, HashSet, VecDeque};

use smallvec::SmallVec;

use crate::{
    catalog::{CatalogError, TypeCatalog},
    common::pool::Key,
    ir::{
        ir_type::{round_up, stride_of_array, vector_align, VEC4_ALIGN, VERTEX_ALIGN},
        CanonName, CompositeLayout, CompositeType, DataFormat, DataType, Len, MemberDecl, PackingRule, SourceLocation,
        TypeHint,
    },
    settings::Std430Rules,
    Diagnostic, ErrorReporter, TypeErrorKind,
};

pub mod calculator;
mod std140;
mod vertex;

pub use calculator::{LayoutCalculator, PlacementError};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("member `{member}` of `{composite}` has type `{ty}`, which cannot be part of a {rule} layout")]
    UnpackableMemberType {
        composite: CanonName,
        member: CanonName,
        ty: CanonName,
        rule: PackingRule,
    },
    #[error("member `{member}` of vertex layout `{composite}` is an array. Vertex attributes cannot be arrays.")]
    ArrayNotAllowedInVertexLayout { composite: CanonName, member: CanonName },
    #[error(
        "member `{member}` of `{composite}` is a resource. Resources are bound to the pipeline, they cannot be stored inside of composites."
    )]
    ResourceMemberNotAllowedInComposite { composite: CanonName, member: CanonName },
    #[error("`offset={value}` of member `{member}` in `{composite}` is invalid: {reason}")]
    InvalidCustomOffset {
        composite: CanonName,
        member: CanonName,
        value: CanonName,
        reason: InvalidOffsetReason,
    },
    #[error("the layouts of these composites depend on each other in a cycle: {}", CyclePath(.cycle))]
    LayoutCycleDetected { cycle: Vec<CanonName> },
    #[error("`{composite}` cannot be laid out because it contains `{dependency}`, which could not be laid out")]
    UnresolvedDependency { composite: CanonName, dependency: CanonName },
    #[error("`{composite}` does not fit into 2^64 bytes, the overflow happens at member `{member}`")]
    CompositeTooLarge { composite: CanonName, member: CanonName },
    #[error("member `{member}` of `{composite}` has attribute `{key}` twice, as `{first}` and as `{second}`")]
    ConflictingMemberAttribute {
        composite: CanonName,
        member: CanonName,
        key: CanonName,
        first: CanonName,
        second: CanonName,
    },
    #[error("format `{format}` of member `{member}` in `{composite}` cannot be used as a vertex attribute format")]
    FormatNotUsableAsVertexAttribute {
        composite: CanonName,
        member: CanonName,
        format: DataFormat,
    },
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidOffsetReason {
    #[error("it is not a number")]
    NotANumber,
    #[error("offsets cannot be negative")]
    Negative,
    #[error("offsets must be smaller than {max}")]
    TooLarge { max: u64 },
    #[error("{offset} is not a multiple of the member alignment {align}")]
    Misaligned { offset: u64, align: u64 },
    #[error("{offset} would overlap the previous member, which ends at {cursor}")]
    OverlapsPreviousMember { offset: u64, cursor: u64 },
}

/// writes `A -> B -> A`
struct CyclePath<'a>(&'a [CanonName]);

impl std::fmt::Display for CyclePath<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, name) in self.0.iter().chain(self.0.first()).enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "`{name}`")?;
        }
        Ok(())
    }
}

/// statistics of a successful [`TypeCatalog::compute_all_layouts`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutPasses {
    /// number of sweeps over the composites that still needed a layout
    pub passes: u32,
    /// number of composites that were laid out
    pub packed: usize,
}

/// the composites that could not be laid out. The reasons were reported
/// to the [`ErrorReporter`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{} composite(s) could not be laid out: {}", .composites.len(), NameList(.composites))]
pub struct LayoutFailed {
    pub composites: Vec<CanonName>,
}

struct NameList<'a>(&'a [CanonName]);

impl std::fmt::Display for NameList<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "`{name}`")?;
        }
        Ok(())
    }
}

type Dependencies = SmallVec<[Key<CompositeType>; 2]>;

pub(crate) enum PackOutcome {
    Packed(CompositeLayout),
    /// the composite contains composites that are not laid out yet
    Pending(Dependencies),
    /// errors were reported
    Failed,
}

/// packs the members of one composite, reporting every problem it finds
/// instead of stopping at the first one.
pub(crate) struct Packer<'a> {
    catalog: &'a TypeCatalog,
    composite: &'a CompositeType,
    sink: &'a mut dyn ErrorReporter,
    failed: bool,
}

impl<'a> Packer<'a> {
    fn new(catalog: &'a TypeCatalog, composite: &'a CompositeType, sink: &'a mut dyn ErrorReporter) -> Self {
        Self {
            catalog,
            composite,
            sink,
            failed: false,
        }
    }

    fn error(&mut self, kind: impl Into<TypeErrorKind>, location: Option<SourceLocation>) {
        self.failed = true;
        self.sink
            .report_error(Diagnostic::error(kind, location.or(self.composite.location())));
    }

    fn warning(&mut self, kind: impl Into<TypeErrorKind>, location: Option<SourceLocation>) {
        self.sink
            .report_warning(Diagnostic::warning(kind, location.or(self.composite.location())));
    }

    fn name(&self) -> CanonName { self.composite.name().clone() }

    /// looks up a member's composite type, reporting handles of other catalogs
    fn nested(&mut self, ty: DataType, location: Option<SourceLocation>) -> Option<&'a CompositeType> {
        let nested = self.catalog.composite(ty);
        if nested.is_none() {
            self.error(CatalogError::UnknownType(ty), location);
        }
        nested
    }

    fn too_large(&mut self, member: &MemberDecl) {
        self.error(
            LayoutError::CompositeTooLarge {
                composite: self.name(),
                member: member.name.clone(),
            },
            member.location,
        );
    }

    /// a key given twice with different values has no single meaning
    fn reject_conflicting_attributes(&mut self, member: &MemberDecl) {
        if let Some((first, second)) = member.attributes.first_conflict() {
            self.error(
                LayoutError::ConflictingMemberAttribute {
                    composite: self.name(),
                    member: member.name.clone(),
                    key: first.key.clone(),
                    first: first.to_string().into(),
                    second: second.to_string().into(),
                },
                member.location,
            );
        }
    }

    fn finish(self, layout: CompositeLayout) -> PackOutcome {
        match self.failed {
            true => PackOutcome::Failed,
            false => PackOutcome::Packed(layout),
        }
    }
}

/// the format of a builtin vector, `None` for anything else
pub(crate) fn vector_format(composite: &CompositeType) -> Option<DataFormat> {
    if composite.type_hint() != TypeHint::VectorType {
        return None;
    }
    match composite.member_type(0)? {
        DataType::Scalar(scalar, _, _) => DataFormat::for_vector(scalar, Len::from_u32(composite.member_count() as u32)?),
        _ => None,
    }
}

impl TypeCatalog {
    /// lays out every composite that has no layout yet.
    ///
    /// composites are visited in registration order. A composite containing a
    /// composite that has no layout yet is retried in the next pass, until a
    /// pass makes no progress. Composites that never converge are reported as
    /// [`LayoutError::LayoutCycleDetected`] or [`LayoutError::UnresolvedDependency`].
    pub fn compute_all_layouts(&mut self, sink: &mut dyn ErrorReporter) -> Result<LayoutPasses, LayoutFailed> {
        let mut stats = LayoutPasses::default();
        let mut failed = Vec::new();
        let mut pending: Vec<(Key<CompositeType>, Dependencies)> = self
            .composites
            .enumerate()
            .filter(|(_, c)| !c.is_laid_out())
            .map(|(key, _)| (key, Dependencies::new()))
            .collect();

        while !pending.is_empty() {
            stats.passes += 1;
            let packed_before = stats.packed;
            let todo = std::mem::take(&mut pending);
            for (key, _) in todo {
                match self.pack(key, sink) {
                    PackOutcome::Packed(layout) => {
                        if let Some(composite) = self.composites.get_mut(key) {
                            composite.set_layout(layout);
                            stats.packed += 1;
                        }
                    }
                    PackOutcome::Pending(dependencies) => pending.push((key, dependencies)),
                    PackOutcome::Failed => failed.push(key),
                }
            }
            log::debug!(
                "layout pass {}: {} packed, {} pending, {} failed",
                stats.passes,
                stats.packed - packed_before,
                pending.len(),
                failed.len()
            );
            if stats.packed == packed_before {
                break;
            }
        }

        if !pending.is_empty() {
            self.report_unconverged(&pending, sink);
        }
        match failed.is_empty() && pending.is_empty() {
            true => Ok(stats),
            false => Err(LayoutFailed {
                composites: failed
                    .into_iter()
                    .chain(pending.into_iter().map(|(key, _)| key))
                    .filter_map(|key| self.composites.get(key))
                    .map(|c| c.name().clone())
                    .collect(),
            }),
        }
    }

    fn pack(&self, key: Key<CompositeType>, sink: &mut dyn ErrorReporter) -> PackOutcome {
        let Some(composite) = self.composites.get(key) else {
            return PackOutcome::Failed;
        };
        let rule = composite.packing_rule();
        if rule != PackingRule::Vertex {
            let dependencies = self.pending_dependencies(composite);
            if !dependencies.is_empty() {
                log::trace!("`{}` waits for {} composite(s)", composite.name(), dependencies.len());
                return PackOutcome::Pending(dependencies);
            }
        }
        let packer = Packer::new(self, composite, sink);
        match rule {
            PackingRule::Vertex => packer.pack_vertex(),
            PackingRule::Std140 => packer.pack_std(false),
            PackingRule::Std430 => packer.pack_std(self.settings.std430 == Std430Rules::Relaxed),
        }
    }

    /// the nested composites of `composite` that are not laid out yet
    fn pending_dependencies(&self, composite: &CompositeType) -> Dependencies {
        let mut dependencies = Dependencies::new();
        for key in composite.members().iter().filter_map(|m| m.ty.as_composite()) {
            let waiting = self.composites.get(key).is_some_and(|c| !c.is_laid_out());
            if waiting && !dependencies.contains(&key) {
                dependencies.push(key);
            }
        }
        dependencies
    }

    fn report_unconverged(&self, pending: &[(Key<CompositeType>, Dependencies)], sink: &mut dyn ErrorReporter) {
        let graph: HashMap<_, &[_]> = pending.iter().map(|(key, deps)| (*key, deps.as_slice())).collect();
        let name = |key| {
            self.composites
                .get(key)
                .map(|c| c.name().clone())
                .unwrap_or_default()
        };
        let location = |key| self.composites.get(key).and_then(CompositeType::location);

        let mut on_cycle = HashSet::new();
        for (start, _) in pending {
            if on_cycle.contains(start) {
                continue;
            }
            if let Some(cycle) = shortest_cycle(*start, &graph) {
                on_cycle.extend(cycle.iter().copied());
                sink.report_error(Diagnostic::error(
                    LayoutError::LayoutCycleDetected {
                        cycle: cycle.into_iter().map(name).collect(),
                    },
                    location(*start),
                ));
            }
        }
        for (key, dependencies) in pending.iter().filter(|(key, _)| !on_cycle.contains(key)) {
            let dependency = dependencies
                .iter()
                .find(|dep| !graph.contains_key(*dep))
                .or(dependencies.first());
            sink.report_error(Diagnostic::error(
                LayoutError::UnresolvedDependency {
                    composite: name(*key),
                    dependency: dependency.map(|dep| name(*dep)).unwrap_or_default(),
                },
                location(*key),
            ));
        }
    }
}

/// the shortest dependency cycle from `start` back to `start` that only
/// passes through composites registered after `start`.
///
/// restricting the search like this finds every cycle once, starting at
/// its earliest registered composite.
fn shortest_cycle(
    start: Key<CompositeType>,
    graph: &HashMap<Key<CompositeType>, &[Key<CompositeType>]>,
) -> Option<Vec<Key<CompositeType>>> {
    let mut parent = HashMap::new();
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        for &next in graph.get(&node).copied().unwrap_or_default() {
            if next == start {
                let mut cycle = vec![node];
                let mut at = node;
                while let Some(&p) = parent.get(&at) {
                    cycle.push(p);
                    at = p;
                }
                cycle.reverse();
                return Some(cycle);
            }
            if next.index() > start.index() && graph.contains_key(&next) && !parent.contains_key(&next) {
                parent.insert(next, node);
                queue.push_back(next);
            }
        }
    }
    None
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cycle_path_display() {
        let error = LayoutError::LayoutCycleDetected {
            cycle: vec!["A".into(), "B".into()],
        };
        assert_eq!(
            error.to_string(),
            "the layouts of these composites depend on each other in a cycle: `A` -> `B` -> `A`"
        );
    }
}
