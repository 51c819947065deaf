//! Error types for joia-core operations.

use thiserror::Error;

/// Recoverable failures of the wallet command parser.
///
/// Every variant's `Display` is the user-facing reason string, in the
/// language of the dashboard. The caller shows it next to the command
/// input and takes no further action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Comando vazio")]
    Empty,

    #[error(
        "Comando não reconhecido. Tente: \"Entrada 500 Venda de curso\", \
         \"Saida 45,90 uber\" ou \"Pix Carlos Silva 11999998888\""
    )]
    Unrecognized,

    #[error("Valor inválido ou ausente no comando")]
    InvalidAmount,

    #[error("Formato de Pix inválido. Tente: \"Pix Nome Sobrenome chave\"")]
    PixFormat,
}

pub type Result<T> = std::result::Result<T, CommandError>;
