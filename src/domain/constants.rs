//! File names, column names, and fixed values shared across the tool.

/// Vendor schedule page (first `<table>` on the page is the schedule grid).
pub const DEFAULT_URL: &str = "https://www.toki.co.jp/purchasing/TLIHTML.files/sheet001.htm";

/// Environment variable that overrides [`DEFAULT_URL`] when `--url` is absent.
pub const URL_ENV: &str = "MATERIALS_URL";

pub const DEFAULT_ENCODING: &str = "shift_jis";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const USER_AGENT: &str = "Mozilla/5.0";

/// Validation-map target that marks a row as dropped.
pub const IGNORE_ME: &str = "IGNORE_ME";

pub const VALIDATION_FAIL: &str = "Schedule could not be validated. Please update validation.csv";

// Lookup inputs.
pub const DATA_CSV: &str = "data.csv";
pub const VALIDATE_CSV: &str = "validate.csv";
pub const BL_CSV: &str = "bl.csv";
pub const HFR_CSV: &str = "hfr.csv";

// Persisted artifacts.
pub const VALIDATE_JSON: &str = ".validate.json";
pub const TRANSLATE_JSON: &str = ".translate.json";
pub const BL_JSON: &str = ".bl.json";
pub const HFR_JSON: &str = ".hfr.json";
pub const SCHEDULE_JSON: &str = ".schedule.json";
pub const DATES_JSON: &str = ".dates.json";

pub const DEFAULT_REPORT: &str = "_materials.csv";

// Catalog (`data.csv`) columns.
pub const CR1: &str = "Custom_Real_01";
pub const QRT: &str = "QtyRealTimeOnHand";
pub const QPO: &str = "QtyOnPurchaseOrder";
pub const MSL: &str = "Minimum_Stock_Level";

// Report columns.
pub const PN: &str = "Part Number";
pub const OH: &str = "On Hand";
pub const BL: &str = "Backlog";
pub const REL: &str = "Released";
pub const HFR: &str = "HFR";
pub const OO: &str = "On Order";
pub const T_AVAIL: &str = "T-Avail";
pub const R_AVAIL: &str = "R-Avail";
pub const RO: &str = "Reorder";

/// Fixed report columns, in output order. Date columns follow.
pub const REPORT_COLUMNS: [&str; 9] = [PN, OH, BL, REL, HFR, OO, T_AVAIL, R_AVAIL, RO];

// Raw table layout.
pub const MIN_ROWS: usize = 6;
pub const MIN_COLS: usize = 6;
pub const DATE_ROW: usize = 3;
pub const FIRST_DATA_ROW: usize = 5;
/// Columns `1..FIRST_QTY_COL` hold vendor metadata and are discarded.
pub const FIRST_QTY_COL: usize = 5;
