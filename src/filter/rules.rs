// Fri Oct 16 2026 - Alex

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub const PRE_INCLUDE_PATTERNS: &[&str] = &[
    "google::protobuf::internal::ExplicitlyConstructed",
    "tensorflow::internal::LogMessage",
    "tensorflow::internal::LogString",
    "tensorflow::internal::CheckOpMessageBuilder",
    "tensorflow::internal::PickUnusedPortOrDie",
    "tensorflow::internal::ValidateDevice",
    "tensorflow::ops::internal::Enter",
    "tensorflow::strings::internal::AppendPieces",
    "tensorflow::strings::internal::CatPieces",
    "tensorflow::errors::Internal",
    "tensorflow::Tensor::CopyFromInternal",
    "tensorflow::kernel_factory::OpKernelRegistrar::InitInternal",
    "tensorflow::io::internal::JoinPathImpl",
];

pub const EXCLUDE_PATTERNS: &[&str] = &[
    "RTTI",
    "deleting destructor",
    "::internal::",
    "Internal",
    "python_op_gen_internal",
    "grappler",
];

pub const INCLUDE_PATTERNS: &[&str] = &[
    r"^(TF_\w*)$",
    r"^(TFE_\w*)$",
    "tensorflow::",
    "functor::",
    r"\?nsync_",
    "stream_executor::",
];

/// Anything that looks like a function, a vtable or RTTI is code. Data
/// symbols are easier to recognize by what they lack.
pub const DATA_EXCLUDE_PATTERNS: &[&str] = &[
    "[)(]",
    "vftable",
    "vbtable",
    "vcall",
    "RTTI",
    "protobuf::internal::ExplicitlyConstructed",
];

pub const DELETING_DESTRUCTOR: &str = "deleting destructor";

static DEFAULT_RULES: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::from_patterns(
        PRE_INCLUDE_PATTERNS,
        EXCLUDE_PATTERNS,
        INCLUDE_PATTERNS,
        DATA_EXCLUDE_PATTERNS,
    )
    .unwrap_or_else(|e| panic!("built-in rule patterns must compile: {}", e))
});

/// A list of patterns matched as one alternation. An empty group matches
/// nothing.
#[derive(Debug, Clone)]
pub struct PatternGroup {
    regex: Option<Regex>,
}

impl PatternGroup {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: combine(patterns)?,
        })
    }

    pub fn empty() -> Self {
        Self { regex: None }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().map_or(false, |re| re.is_match(text))
    }
}

/// Joins patterns into a single alternation. Each pattern is grouped so
/// anchors stay with their own branch.
pub fn combine<S: AsRef<str>>(patterns: &[S]) -> Result<Option<Regex>, regex::Error> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let joined = patterns
        .iter()
        .map(|p| format!("(?:{})", p.as_ref()))
        .collect::<Vec<_>>()
        .join("|");

    Regex::new(&joined).map(Some)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    PreInclude,
    Exclude,
    Include,
    Veto,
}

impl Tier {
    /// Evaluation order of the include/exclude chain. The veto runs after
    /// whichever of these decides.
    pub const CHAIN: [Tier; 3] = [Tier::PreInclude, Tier::Exclude, Tier::Include];
}

/// Outcome of a single tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Drop,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Code,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Keep { tier: Tier, kind: SymbolKind },
    Drop { tier: Tier },
}

impl Decision {
    pub fn is_kept(&self) -> bool {
        matches!(self, Decision::Keep { .. })
    }

    pub fn tier(&self) -> Tier {
        match self {
            Decision::Keep { tier, .. } | Decision::Drop { tier } => *tier,
        }
    }

    pub fn kind(&self) -> Option<SymbolKind> {
        match self {
            Decision::Keep { kind, .. } => Some(*kind),
            Decision::Drop { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuleSet {
    pub pre_include: PatternGroup,
    pub exclude: PatternGroup,
    pub include: PatternGroup,
    pub data_exclude: PatternGroup,
}

impl Default for RuleSet {
    fn default() -> Self {
        DEFAULT_RULES.clone()
    }
}

impl RuleSet {
    pub fn from_patterns<S: AsRef<str>>(
        pre_include: &[S],
        exclude: &[S],
        include: &[S],
        data_exclude: &[S],
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            pre_include: PatternGroup::new(pre_include)?,
            exclude: PatternGroup::new(exclude)?,
            include: PatternGroup::new(include)?,
            data_exclude: PatternGroup::new(data_exclude)?,
        })
    }

    pub fn evaluate(&self, tier: Tier, undecorated: &str) -> Verdict {
        match tier {
            Tier::PreInclude if self.pre_include.is_match(undecorated) => Verdict::Keep,
            Tier::Exclude if self.exclude.is_match(undecorated) => Verdict::Drop,
            Tier::Include if self.include.is_match(undecorated) => Verdict::Keep,
            Tier::Include => Verdict::Drop,
            Tier::Veto if undecorated.contains(DELETING_DESTRUCTOR) => Verdict::Drop,
            _ => Verdict::Next,
        }
    }

    pub fn kind_of(&self, undecorated: &str) -> SymbolKind {
        if self.data_exclude.is_match(undecorated) {
            SymbolKind::Code
        } else {
            SymbolKind::Data
        }
    }

    pub fn classify(&self, undecorated: &str) -> Decision {
        let mut deciding = Tier::Include;
        for tier in Tier::CHAIN {
            match self.evaluate(tier, undecorated) {
                Verdict::Next => continue,
                Verdict::Drop => return Decision::Drop { tier },
                Verdict::Keep => {
                    deciding = tier;
                    break;
                }
            }
        }

        if self.evaluate(Tier::Veto, undecorated) == Verdict::Drop {
            return Decision::Drop { tier: Tier::Veto };
        }

        Decision::Keep {
            tier: deciding,
            kind: self.kind_of(undecorated),
        }
    }
}
