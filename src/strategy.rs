//! Resolved strategies and the concurrent cache that memoizes them.
//!
//! The cache maps each [`ConversionPairKey`] to the [`ResolvedStrategy`]
//! chosen for it. Lookups never block on resolution: a miss runs the
//! resolver without holding any shard lock, then publishes with
//! insert-if-absent. Concurrent resolvers of the same pair are harmless
//! since resolution is deterministic, and the first published entry wins.

use convert_core::{ConversionPairKey, Definition};
use dashmap::DashMap;
use std::fmt;
use tracing::trace;

/// How a conversion between one type pair is executed.
#[derive(Debug, Clone)]
pub enum ResolvedStrategy {
    /// Source and target are the same type.
    Identity,
    /// A registered conversion function.
    ByDefinition(Definition),
    /// A registered `From`-based cast.
    ByAssignableCast(Definition),
    /// Optional source, non-optional target.
    NullableSourceUnwrap,
    /// Non-optional source, optional target.
    NullableTargetWrap,
    /// Optional on both sides.
    NullableBothWrap,
    EnumSourceToPlain,
    PlainToEnumTarget,
    EnumSourceToEnumTarget,
    /// No path exists; executing it fails.
    Unsupported,
}

/// Fieldless discriminant of a [`ResolvedStrategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Identity,
    ByDefinition,
    ByAssignableCast,
    NullableSourceUnwrap,
    NullableTargetWrap,
    NullableBothWrap,
    EnumSourceToPlain,
    PlainToEnumTarget,
    EnumSourceToEnumTarget,
    Unsupported,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Identity => "identity",
            Self::ByDefinition => "definition",
            Self::ByAssignableCast => "assignable-cast",
            Self::NullableSourceUnwrap => "nullable-source-unwrap",
            Self::NullableTargetWrap => "nullable-target-wrap",
            Self::NullableBothWrap => "nullable-both-wrap",
            Self::EnumSourceToPlain => "enum-source",
            Self::PlainToEnumTarget => "enum-target",
            Self::EnumSourceToEnumTarget => "enum-both",
            Self::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

impl ResolvedStrategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::Identity => StrategyKind::Identity,
            Self::ByDefinition(_) => StrategyKind::ByDefinition,
            Self::ByAssignableCast(_) => StrategyKind::ByAssignableCast,
            Self::NullableSourceUnwrap => StrategyKind::NullableSourceUnwrap,
            Self::NullableTargetWrap => StrategyKind::NullableTargetWrap,
            Self::NullableBothWrap => StrategyKind::NullableBothWrap,
            Self::EnumSourceToPlain => StrategyKind::EnumSourceToPlain,
            Self::PlainToEnumTarget => StrategyKind::PlainToEnumTarget,
            Self::EnumSourceToEnumTarget => StrategyKind::EnumSourceToEnumTarget,
            Self::Unsupported => StrategyKind::Unsupported,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

/// Concurrent memo of resolved strategies, keyed by type pair.
#[derive(Debug, Default)]
pub struct StrategyCache {
    entries: DashMap<ConversionPairKey, ResolvedStrategy>,
}

impl StrategyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pair: &ConversionPairKey) -> Option<ResolvedStrategy> {
        self.entries.get(pair).map(|entry| entry.value().clone())
    }

    /// Return the cached strategy for `pair`, resolving and publishing it on a miss.
    ///
    /// `resolve` may run on several threads for the same pair; all callers
    /// observe whichever result was published first. It may itself consult
    /// this cache.
    pub fn get_or_resolve<F>(&self, pair: ConversionPairKey, resolve: F) -> ResolvedStrategy
    where
        F: FnOnce() -> ResolvedStrategy,
    {
        if let Some(hit) = self.get(&pair) {
            trace!("Strategy cache hit for {pair}");
            return hit;
        }

        let resolved = resolve();
        self.entries.entry(pair).or_insert(resolved).value().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
