pub(crate) mod filelist;
pub(crate) mod run;
