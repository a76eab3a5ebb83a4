/// File holding patient records.
pub const PATIENTS_FILENAME: &str = "patients.json";

/// File holding condition records.
pub const CONDITIONS_FILENAME: &str = "conditions.json";

/// File holding observation records.
pub const OBSERVATIONS_FILENAME: &str = "observations.json";

/// File holding medication request records.
pub const MEDICATIONS_FILENAME: &str = "medications.json";

/// File holding encounter records.
pub const ENCOUNTERS_FILENAME: &str = "encounters.json";

/// Content written to a resource file that does not exist yet.
pub(crate) const EMPTY_COLLECTION: &str = "{}\n";

/// Suffix of the sibling file used for atomic rewrites.
pub(crate) const TEMP_SUFFIX: &str = "tmp";
