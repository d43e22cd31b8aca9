//! Cross-crate tests exercising the full pattern to match pipeline.

#[cfg(test)]
mod matching;
#[cfg(test)]
mod scenarios;
