/// Properties every page layout (`base.html`) relies on.
pub trait BaseTemplate {
    fn page_title(&self) -> &str;
    fn base_url(&self) -> &str;
    fn messages(&self) -> &Vec<String>;
    fn has_messages(&self) -> bool;
}

/// Implement BaseTemplate for a struct with the standard layout fields
#[macro_export]
macro_rules! impl_base_template {
    ($struct_name:ty) => {
        impl $crate::templates::BaseTemplate for $struct_name {
            fn page_title(&self) -> &str {
                &self.page_title
            }
            fn base_url(&self) -> &str {
                &self.base_url
            }
            fn messages(&self) -> &Vec<String> {
                &self.messages
            }
            fn has_messages(&self) -> bool {
                self.has_messages
            }
        }
    };
}
