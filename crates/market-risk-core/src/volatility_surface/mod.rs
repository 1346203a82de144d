pub mod implied_vol_surface;
