pub mod tic_tac_toe;
