mod labels;
pub use labels::Labels;

mod key;
pub use key::WorkloadKey;

mod constants;
pub use constants::{LABEL_APP_UNIQUE, MAX_LABEL_VALUE_LEN, REASON_CONTAINER_CREATING};
