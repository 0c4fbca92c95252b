//! OpenDocument (.odt, .ods) adapters.
//!
//! Both formats are ZIP packages with the body in `content.xml` and the
//! named styles in `styles.xml`. Styles from both parts are merged into one
//! [`StyleTable`](styles::StyleTable) that the Writer and Calc readers share.

pub mod namespaces;
pub mod ods;
pub mod odt;
pub mod styles;
pub mod text;
