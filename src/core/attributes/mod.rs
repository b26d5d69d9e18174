mod attribute;
mod date_attribute;
mod nominal_attribute;
mod numeric_attribute;

pub use attribute::{Attribute, AttributeRef};
pub use date_attribute::DateAttribute;
pub use nominal_attribute::NominalAttribute;
pub use numeric_attribute::NumericAttribute;
