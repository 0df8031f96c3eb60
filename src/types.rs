use crate::error::{Result, TaxaError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// NCBI taxon identifier.
pub type TaxonId = i32;

/// Peptide sequence mapped onto the taxa it may originate from.
///
/// Ordered containers keep iteration (and therefore seeded sampling) reproducible.
pub type PeptideTaxa = BTreeMap<String, BTreeSet<TaxonId>>;

/// Number of recognised NCBI ranks, and the length of every lineage.
pub const RANK_COUNT: usize = 27;

#[derive(clap::ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Superkingdom,
    Kingdom,
    Subkingdom,
    Superphylum,
    Phylum,
    Subphylum,
    Superclass,
    Class,
    Subclass,
    Superorder,
    Order,
    Suborder,
    Infraorder,
    Superfamily,
    Family,
    Subfamily,
    Tribe,
    Subtribe,
    Genus,
    Subgenus,
    #[value(name = "species_group")]
    SpeciesGroup,
    #[value(name = "species_subgroup")]
    SpeciesSubgroup,
    Species,
    Subspecies,
    Strain,
    Varietas,
    Forma,
}

impl Rank {
    /// All ranks, from least to most specific.
    pub const ALL: [Rank; RANK_COUNT] = [
        Rank::Superkingdom,
        Rank::Kingdom,
        Rank::Subkingdom,
        Rank::Superphylum,
        Rank::Phylum,
        Rank::Subphylum,
        Rank::Superclass,
        Rank::Class,
        Rank::Subclass,
        Rank::Superorder,
        Rank::Order,
        Rank::Suborder,
        Rank::Infraorder,
        Rank::Superfamily,
        Rank::Family,
        Rank::Subfamily,
        Rank::Tribe,
        Rank::Subtribe,
        Rank::Genus,
        Rank::Subgenus,
        Rank::SpeciesGroup,
        Rank::SpeciesSubgroup,
        Rank::Species,
        Rank::Subspecies,
        Rank::Strain,
        Rank::Varietas,
        Rank::Forma,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Rank::Superkingdom => "superkingdom",
            Rank::Kingdom => "kingdom",
            Rank::Subkingdom => "subkingdom",
            Rank::Superphylum => "superphylum",
            Rank::Phylum => "phylum",
            Rank::Subphylum => "subphylum",
            Rank::Superclass => "superclass",
            Rank::Class => "class",
            Rank::Subclass => "subclass",
            Rank::Superorder => "superorder",
            Rank::Order => "order",
            Rank::Suborder => "suborder",
            Rank::Infraorder => "infraorder",
            Rank::Superfamily => "superfamily",
            Rank::Family => "family",
            Rank::Subfamily => "subfamily",
            Rank::Tribe => "tribe",
            Rank::Subtribe => "subtribe",
            Rank::Genus => "genus",
            Rank::Subgenus => "subgenus",
            Rank::SpeciesGroup => "species_group",
            Rank::SpeciesSubgroup => "species_subgroup",
            Rank::Species => "species",
            Rank::Subspecies => "subspecies",
            Rank::Strain => "strain",
            Rank::Varietas => "varietas",
            Rank::Forma => "forma",
        }
    }

    /// Slot of this rank inside a [`Lineage`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// This rank followed by every more specific rank.
    pub fn descendant_ranks(&self) -> &'static [Rank] {
        &Rank::ALL[self.index()..]
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rank {
    type Err = TaxaError;

    fn from_str(s: &str) -> Result<Self> {
        Rank::ALL
            .iter()
            .copied()
            .find(|rank| rank.name() == s)
            .ok_or_else(|| TaxaError::UnknownRank(s.to_string()))
    }
}

/// Ancestors of a taxon, one slot per [`Rank`]. `None` marks a rank without an ancestor.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Lineage([Option<TaxonId>; RANK_COUNT]);

impl Lineage {
    pub fn new(slots: [Option<TaxonId>; RANK_COUNT]) -> Self {
        Lineage(slots)
    }

    /// Builds a lineage from `(rank, ancestor)` pairs, leaving every other slot empty.
    pub fn from_ranks<I>(ancestors: I) -> Self
    where
        I: IntoIterator<Item = (Rank, TaxonId)>,
    {
        let mut slots = [None; RANK_COUNT];
        for (rank, taxon) in ancestors {
            slots[rank.index()] = Some(taxon);
        }
        Lineage::new(slots)
    }

    pub fn at(&self, rank: Rank) -> Option<TaxonId> {
        self.0[rank.index()]
    }

    pub fn slots(&self) -> &[Option<TaxonId>] {
        &self.0
    }
}

/// Score and spectral support of a single identified peptide.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
pub struct Evidence {
    pub score: f64,
    pub psm_count: u32,
}

pub type PeptideEvidence = BTreeMap<String, Evidence>;
