pub mod pbrhdrenvironment;
