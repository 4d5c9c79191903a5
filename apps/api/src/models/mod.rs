pub mod vaga;
