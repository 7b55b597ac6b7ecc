/// The closed set of department codes the availability site serves
use super::error::CatalogError;

/// Department abbreviations at UH Manoa.
pub const DEPARTMENT_LIST: &[&str] = &[
    "ACC", "ACM", "AMST", "ANAT", "ANSC", "ANTH", "APDM", "ARAB", "ARCH", "ART", "AS", "ASAN",
    "ASTR", "BE", "BIOC", "BIOL", "BIOM", "BLAW", "BOT", "BUS", "CAAM", "CAM", "CAS", "CEE",
    "CHAM", "CHEM", "CHN", "CIS", "CMB", "COM", "CSD", "CUL", "DH", "DIS", "DNCE", "DRB", "EALL",
    "ECON", "EDCS", "EDEA", "EDEF", "EDEP", "EE", "ELI", "ENG", "ENGR", "ES", "ETEC", "FAMR", "FIL",
    "FIN", "FMCH", "FR", "FSHN", "GEOG", "GER", "GERI", "GG", "GRK", "HAW", "HIST", "HNDI", "HON",
    "HRM", "HWST", "ICS", "ILO", "IND", "INS", "IP", "IS", "ITAL", "ITE", "ITM", "JOUR", "JPN",
    "KOR", "KRS", "LAIS", "LATN", "LAW", "LING", "LIS", "LLEA", "LLL", "LLM", "LWEV", "LWJT",
    "LWLW", "LWPA", "LWUL", "MAO", "MATH", "MBBE", "MDED", "ME", "MED", "MEDT", "MET", "MGT",
    "MICR", "MKT", "MSL", "MUS", "NHH", "NREM", "NURS", "OBGN", "OCN", "OEST", "ORE", "PACE",
    "PACS", "PATH", "PED", "PEPS", "PH", "PHIL", "PHRM", "PHYL", "PHYS", "PLAN", "POLS", "PORT",
    "PPC", "PPST", "PSTY", "PSY", "PUBA", "RE", "REL", "REPR", "RUS", "SAM", "SLS", "SNSK", "SOC",
    "SOCS", "SP", "SPAN", "SPED", "SURG", "SW", "TAHT", "THAI", "THEA", "TI", "TIM", "TONG", "TPSS",
    "TRMD", "VIET", "WS", "ZOOL",
];

/// Returns true if `code` names a known department (exact match).
pub fn is_valid_department(code: &str) -> bool {
    DEPARTMENT_LIST.contains(&code)
}

/// Rejects unknown department codes before anything is fetched.
pub fn validate_department(code: &str) -> Result<(), CatalogError> {
    if is_valid_department(code) {
        Ok(())
    } else {
        Err(CatalogError::UnknownDepartment {
            code: code.to_string(),
        })
    }
}
