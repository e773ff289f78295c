pub mod labelprinter;
