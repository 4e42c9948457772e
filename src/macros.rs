// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand!
    () => {
        ::std::string::String::new()
    };
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

#[macro_export]
macro_rules! headers {
    // Owned header row from string slices.
    ($($h:expr),* $(,)?) => {
        ::std::vec![$(::std::string::String::from($h)),*]
    };
}
