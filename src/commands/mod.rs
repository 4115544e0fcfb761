pub mod geotag;
