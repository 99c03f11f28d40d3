use thiserror::Error;


/// Errors that may appear while generating a map
#[derive(Debug, Error)]
pub enum MapError {

    #[error("Parameter {name} = {value} is outside the allowed range [{min}, {max}]")]
    /// A numeric parameter falls outside its documented range
    InvalidParameter { name: &'static str, value: usize, min: usize, max: usize },

    #[error("General I/O error occurred while writing the output image")]
    /// I/O error occurred while writing the output image
    Io(#[from] std::io::Error),

    #[error("Error returned by the png encoder")]
    /// Error returned by the png encoder
    PngEncoding(#[from] png::EncodingError),
}
