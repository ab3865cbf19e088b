pub mod html;
pub mod ipeadata;
