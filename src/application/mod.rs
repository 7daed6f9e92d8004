pub mod order_assembler;
