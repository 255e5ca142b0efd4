use clusterforge::cluster::ClusterConfiguration;
use clusterforge::template::TemplateRecord;
use schemars::schema_for;

fn main() -> Result<(), serde_yaml::Error> {
    print!("{}", serde_yaml::to_string(&schema_for!(ClusterConfiguration))?);
    println!("---");
    print!("{}", serde_yaml::to_string(&schema_for!(TemplateRecord))?);
    Ok(())
}
