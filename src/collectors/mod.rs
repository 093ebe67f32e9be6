pub mod diskstats;
pub mod leds;
