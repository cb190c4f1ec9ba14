mod compilers;
mod fetcher;
mod input;
mod output;

pub use compilers::{Compilers, Error};
pub use fetcher::{FetchError, Fetcher, SvmFetcher};
pub use input::build_input;
pub use output::{Bytecode, CompilerOutput, Contract, Diagnostic, Evm};
