//! Domain modules. Each carries its entity model, a repository pair (`pg`
//! and `data_api`) with identical contracts, the service dispatch and the
//! HTTP routes.

pub mod avisos_compra;
pub mod categorias;
pub mod clientes;
pub mod cores;
pub mod financeiro;
pub mod fornecedores;
pub mod movimentacoes;
pub mod produtos;
pub mod vendas;
