// Biomedical text fixtures with known pairs and substitution outputs
// WHY: Golden-text testing requires deterministic input/output pairs for validation

/// Two definitions, each used again later in the same text
pub const CYTOKINE_ABSTRACT: &str = "Tumor necrosis factor (TNF) and interleukin 6 (IL6) were measured. \
TNF levels correlated with IL6 levels.";

pub const CYTOKINE_SUBSTITUTED: &str = "Tumor necrosis factor (Tumor necrosis factor) and \
interleukin 6 (interleukin 6) were measured. Tumor necrosis factor levels correlated with \
interleukin 6 levels.";

/// Same abbreviation defined with and without a trailing "gene"
pub const GENE_ABSTRACT: &str = "The tumor protein 53 gene (TP53) was mutated. Tumor protein 53 (TP53) binds DNA.";

pub const GENE_SUBSTITUTED: &str = "The tumor protein 53 gene (Tumor protein 53) was mutated. \
Tumor protein 53 (Tumor protein 53) binds DNA.";

/// Two different long forms; only the second one's initials spell the abbreviation
pub const COMPETING_ABSTRACT: &str = "Interleukin 6 (IL6) rose. Insulin-like 6 (IL6) fell.";

/// Brackets that are not abbreviations
pub const NON_ABBREVIATION_TEXT: &str = "see figure (a) for details and the ratio (p=0.05) was low.";

pub const DNA_SENTENCE: &str = "Deoxyribonucleic acid (DNA) was sequenced.";

/// Documents for collection tests, keyed by id
pub const COLLECTION: &[(&str, &str)] = &[
    ("1001", "Interleukin 6 (IL6) is elevated."),
    ("1002", "Tumor necrosis factor (TNF) rose.\nIL6 was stable."),
    ("1003", "In mice interleukin 6 (IL6) dropped."),
];

/// Sentences whose pairs must satisfy the anchor and containment properties
pub const PROPERTY_SENTENCES: &[&str] = &[
    CYTOKINE_ABSTRACT,
    GENE_ABSTRACT,
    COMPETING_ABSTRACT,
    DNA_SENTENCE,
    "Patients with chronic obstructive pulmonary disease (COPD) were enrolled.",
    "We used magnetic resonance imaging (MRI) and computed tomography (CT) scans.",
    "Levels of C-reactive protein (CRP) and the body mass index (BMI) were recorded.",
    "The heat shock protein (HSP) response and also the unfolded protein response (UPR) were studied.",
];
