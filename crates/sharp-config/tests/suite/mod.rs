mod discovery;
mod loading;
